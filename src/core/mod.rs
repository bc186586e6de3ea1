//! Core sample types and structures

/// Channel batches and their indices
pub mod batch;
/// PCM stream format
pub mod format;
/// Sample ranges within a batch
pub mod selection;

pub use batch::{BatchIndex, ChannelBatch};
pub use format::{ByteOrder, PcmFormat};
pub use selection::SampleSelection;
