#![warn(missing_docs)]

//! # Beat-Dropper: Parallel Per-Window Audio Transforms
//!
//! Applies a pluggable transform ("sample modifier") to consecutive windows
//! of a 16-bit stereo PCM stream, running the transforms across all cores
//! while writing the results back out in their original order.
//!
//! ## Features
//!
//! - **Read** - 16-bit WAV or headerless PCM in either byte order
//! - **Modify** - Drop beats, trim, reverse, stretch, insert silence, normalize
//! - **Schedule** - Ordered concurrent map with bounded in-flight batches
//! - **Write** - 16-bit WAV or headerless PCM
//! - **CLI** - `beat-dropper process` / `beat-dropper list`
//!
//! ## Quick Start
//!
//! ```ignore
//! use beat_dropper::modifier::{ModifierOptions, ModifierRegistry};
//! use beat_dropper::processor::{PipelineConfig, Processor};
//! use beat_dropper::sink::WavSink;
//! use beat_dropper::source::WavSource;
//!
//! let registry = ModifierRegistry::with_builtins();
//! let options = ModifierOptions::parse(["bpm=128", "drop=4"])?;
//! let modifier = registry.create("beat-drop", &options)?;
//!
//! let processor = Processor::new(modifier.into(), PipelineConfig::default());
//! let source = WavSource::open("input.wav")?;
//! processor.process(source, |spec| WavSink::create("output.wav", spec))?;
//! ```

// Declare modules
/// Core sample types and structures
pub mod core;
/// Error types for audio operations
pub mod error;
/// Sample modifiers and their registry
pub mod modifier;
/// Batch processing pipeline
pub mod processor;
/// PCM byte sinks
pub mod sink;
/// PCM sample sources
pub mod source;

// Export public types
pub use crate::core::{BatchIndex, ByteOrder, ChannelBatch, PcmFormat, SampleSelection};
pub use error::{AudioError, AudioResult};
pub use modifier::{ModifierRegistry, SampleModifier};
pub use processor::{PipelineConfig, ProcessingStats, Processor};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
