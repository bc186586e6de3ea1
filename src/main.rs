//! Beat-Dropper Command Line Interface
//!
//! Applies a sample modifier to a 16-bit stereo WAV or raw PCM file.

use beat_dropper::modifier::{ModifierOptions, ModifierRegistry};
use beat_dropper::processor::{PipelineConfig, ProcessingStats, Processor};
use beat_dropper::sink::{PcmSink, RawSink, SinkSpec, WavSink};
use beat_dropper::source::{self, PcmSource};
use beat_dropper::{AudioResult, ByteOrder, PcmFormat};
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "beat-dropper")]
#[command(about = "Apply per-window sample modifiers to stereo audio", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a modifier over an audio file
    Process(ProcessArgs),

    /// List available modifiers
    List,
}

#[derive(clap::Args)]
struct ProcessArgs {
    /// Input file (.wav, anything else is read as raw PCM)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Modifier id (see `list`)
    #[arg(short, long)]
    modifier: String,

    /// Modifier option as key=value, may be repeated
    #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE")]
    args: Vec<String>,

    /// Output file; defaults to "<input> [<modification>].<ext>" next to the input
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write headerless PCM instead of WAV
    #[arg(long)]
    raw: bool,

    /// Sample rate of a raw PCM input
    #[arg(long, default_value = "44100")]
    sample_rate: u32,

    /// Channel count of a raw PCM input
    #[arg(long, default_value = "2")]
    channels: u16,

    /// Raw PCM input is big-endian
    #[arg(long)]
    big_endian: bool,

    /// Worker threads (default: available parallelism)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Batches in flight (default: workers + 2)
    #[arg(short, long)]
    buffer: Option<usize>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let registry = ModifierRegistry::with_builtins();

    match cli.command {
        Commands::List => {
            println!("Available modifiers:");
            for factory in registry.factories() {
                println!("\t{:<12} {}", factory.id(), factory.description());
            }
            ExitCode::SUCCESS
        }
        Commands::Process(args) => match process(&registry, args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn process(registry: &ModifierRegistry, args: ProcessArgs) -> AudioResult<()> {
    info!("beat-dropper {}", beat_dropper::VERSION);

    let options = ModifierOptions::parse(&args.args)?;
    let modifier = registry.create(&args.modifier, &options).inspect_err(|_| {
        eprintln!("Available modifiers:\n{}", registry.format_available_for_cli());
    })?;

    let extension = if args.raw { "pcm" } else { "wav" };
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| Processor::output_file_name(&args.input, &*modifier, extension));

    let mut config = PipelineConfig::default();
    if let Some(workers) = args.workers {
        config = config.with_worker_count(workers);
    }
    if let Some(buffer) = args.buffer {
        config = config.with_buffer_capacity(buffer);
    }

    let byte_order = if args.big_endian {
        ByteOrder::Big
    } else {
        ByteOrder::Little
    };
    let raw_format = PcmFormat::new(args.sample_rate, args.channels, byte_order)?;
    let source = source::open_file(&args.input, raw_format)?;

    info!("{:?} -> {:?} ({})", args.input, output, modifier.describe_modification());
    let processor = Processor::new(Arc::from(modifier), config);
    let result = write_output(&processor, source, &output, args.raw);

    let stats = result?;
    info!(
        "Wrote {} samples per channel ({} bytes of PCM) to {:?}",
        stats.samples_written, stats.bytes_written, output
    );
    Ok(())
}

/// Run the processor into `output`, removing the file again if the run
/// fails after the sink was opened. A failure before that leaves any
/// existing file at `output` alone.
fn write_output<S: PcmSource>(
    processor: &Processor,
    source: S,
    output: &Path,
    raw: bool,
) -> AudioResult<ProcessingStats> {
    let mut sink_opened = false;
    let result = processor.process(source, |spec| {
        let sink = open_sink(output, spec, raw)?;
        sink_opened = true;
        Ok(sink)
    });

    if result.is_err() && sink_opened {
        // Never leave a truncated file that looks like a finished one
        if let Err(e) = fs::remove_file(output) {
            warn!("Failed to remove partial output {:?}: {}", output, e);
        } else {
            warn!("Removed partial output {:?}", output);
        }
    }
    result
}

fn open_sink(path: &Path, spec: SinkSpec, raw: bool) -> AudioResult<Box<dyn PcmSink>> {
    if raw {
        Ok(Box::new(RawSink::new(File::create(path)?)))
    } else {
        Ok(Box::new(WavSink::create(path, spec)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beat_dropper::modifier::Identity;
    use beat_dropper::source::RawSource;
    use beat_dropper::{AudioError, BatchIndex, ChannelBatch, SampleModifier};
    use std::io::Cursor;
    use tempfile::TempDir;

    struct Failing;

    impl SampleModifier for Failing {
        fn requested_window_ms(&self) -> f64 {
            1.0
        }

        fn modify(&self, _batch: ChannelBatch, _index: BatchIndex) -> AudioResult<ChannelBatch> {
            Err(AudioError::ProcessingError("broken".to_string()))
        }

        fn describe_modification(&self) -> String {
            "broken".to_string()
        }
    }

    fn raw_source(channels: u16, pairs: usize) -> RawSource<Cursor<Vec<u8>>> {
        let format = PcmFormat::new(8000, channels, ByteOrder::Little).unwrap();
        RawSource::new(Cursor::new(vec![0u8; pairs * 4]), format)
    }

    fn processor(modifier: impl SampleModifier + 'static) -> Processor {
        Processor::new(Arc::new(modifier), PipelineConfig::default().with_worker_count(2))
    }

    #[test]
    fn test_rejected_input_keeps_existing_output() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("keep.wav");
        fs::write(&output, "precious user data").unwrap();

        let result = write_output(&processor(Identity::new(10.0).unwrap()), raw_source(1, 100), &output, false);

        assert!(matches!(result, Err(AudioError::InvalidChannels { .. })));
        assert_eq!(fs::read_to_string(&output).unwrap(), "precious user data");
    }

    #[test]
    fn test_failed_run_removes_partial_output() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("partial.pcm");

        let result = write_output(&processor(Failing), raw_source(2, 100), &output, true);

        assert!(matches!(result, Err(AudioError::TransformFailed { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn test_successful_run_keeps_output() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.pcm");

        let stats = write_output(&processor(Identity::new(10.0).unwrap()), raw_source(2, 100), &output, true).unwrap();

        assert_eq!(stats.samples_written, 100);
        assert_eq!(fs::read(&output).unwrap().len(), 400);
    }
}
