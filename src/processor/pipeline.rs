use super::{BatchReader, ByteGather, OrderedScheduler, PipelineConfig, ProcessingStats};
use crate::core::{BatchIndex, ChannelBatch};
use crate::error::{AudioError, AudioResult};
use crate::modifier::SampleModifier;
use crate::sink::{PcmSink, SinkSpec};
use crate::source::PcmSource;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Applies a [`SampleModifier`] to a whole PCM stream.
///
/// Source → [`BatchReader`] → [`OrderedScheduler`] → [`ByteGather`] → sink.
pub struct Processor {
    modifier: Arc<dyn SampleModifier>,
    config: PipelineConfig,
}

impl Processor {
    /// Create a processor for an already resolved modifier
    pub fn new(modifier: Arc<dyn SampleModifier>, config: PipelineConfig) -> Self {
        Processor { modifier, config }
    }

    /// Get the modifier
    pub fn modifier(&self) -> &dyn SampleModifier {
        &*self.modifier
    }

    /// Run the whole stream through the modifier into a sink.
    ///
    /// The source must be stereo; this is checked before anything is read and
    /// before `open_sink` is called. Any failure aborts the run; the sink is
    /// only finalized after every batch has been written.
    pub fn process<S, K, O>(&self, source: S, open_sink: O) -> AudioResult<ProcessingStats>
    where
        S: PcmSource,
        K: PcmSink,
        O: FnOnce(SinkSpec) -> AudioResult<K>,
    {
        let format = source.format();
        format.require_stereo()?;

        let window_ms = self.modifier.requested_window_ms();
        let window = format.window_samples(window_ms);
        info!(
            "Loaded {} Hz stereo {} PCM; windows of {} ms = {} samples",
            format.sample_rate,
            format.byte_order.name(),
            window_ms,
            window
        );
        if window == 0 {
            warn!("Window of {} ms holds no samples, output will be empty", window_ms);
        }

        let scheduler = OrderedScheduler::new(self.config.worker_count(), self.config.buffer_capacity())?;
        debug!(
            "Using {} workers with {} batches in flight",
            scheduler.workers(),
            scheduler.capacity()
        );

        let mut sink = open_sink(SinkSpec {
            sample_rate: format.sample_rate,
            byte_order: format.byte_order,
        })?;
        let gather = ByteGather::new(format.byte_order);
        let mut stats = ProcessingStats::default();
        let start_time = Instant::now();

        let modifier = Arc::clone(&self.modifier);
        let transform = move |batch: ChannelBatch, index: BatchIndex| {
            modifier.modify(batch, index).map_err(|e| match e {
                AudioError::TransformFailed { .. } => e,
                e => AudioError::TransformFailed {
                    index,
                    message: e.to_string(),
                },
            })
        };

        let batches = scheduler.run(
            BatchReader::new(source, window),
            transform,
            |index, batch| {
                let bytes = gather.gather(&batch)?;
                sink.write(&bytes)?;
                debug!("Batch {}: wrote {} samples", index, batch.len());
                stats.samples_written += batch.len() as u64;
                stats.bytes_written += bytes.len() as u64;
                Ok(())
            },
        )?;
        stats.batches_processed = batches;

        sink.finalize()?;

        info!(
            "Processed {} batches in {:.1}s, {} samples per channel written",
            stats.batches_processed,
            start_time.elapsed().as_secs_f64(),
            stats.samples_written
        );
        Ok(stats)
    }

    /// Sibling of `input` named `"<stem> [<modification>].<extension>"`
    pub fn output_file_name(input: &Path, modifier: &dyn SampleModifier, extension: &str) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        input.with_file_name(format!(
            "{} [{}].{}",
            stem,
            modifier.describe_modification(),
            extension
        ))
    }
}
