use super::{ModifierOptions, SampleModifier, SampleModifierFactory};
use crate::core::{BatchIndex, ChannelBatch};
use crate::error::{AudioError, AudioResult};

/// Appends a gap of silence after every Nth window
#[derive(Debug, Clone)]
pub struct SilenceInserter {
    window_ms: f64,
    every: usize,
    /// Gap length relative to the batch it follows
    gap: f64,
}

impl SilenceInserter {
    /// Create an inserter adding `gap` times the batch length after every `every` batches
    pub fn new(window_ms: f64, every: usize, gap: f64) -> AudioResult<Self> {
        let window_ms = super::positive_ms("window", window_ms)?;
        if every == 0 {
            return Err(AudioError::ConfigError(
                "every must be at least 1".to_string(),
            ));
        }
        if !gap.is_finite() || !(0.0..=super::MAX_RATIO).contains(&gap) {
            return Err(AudioError::ConfigError(format!(
                "gap must be between 0 and {}, got {}",
                super::MAX_RATIO,
                gap
            )));
        }
        Ok(SilenceInserter {
            window_ms,
            every,
            gap,
        })
    }
}

impl SampleModifier for SilenceInserter {
    fn requested_window_ms(&self) -> f64 {
        self.window_ms
    }

    fn modify(&self, batch: ChannelBatch, index: BatchIndex) -> AudioResult<ChannelBatch> {
        if (index.get() + 1) % self.every as u64 != 0 {
            return Ok(batch);
        }

        let gap = (batch.len() as f64 * self.gap).round() as usize;
        batch.map_channels(|mut samples| {
            samples.resize(samples.len() + gap, 0);
            Ok(samples)
        })
    }

    fn describe_modification(&self) -> String {
        format!("silence after every {} of {} ms", self.every, self.window_ms)
    }
}

/// Factory for [`SilenceInserter`]
pub struct SilenceFactory;

impl SampleModifierFactory for SilenceFactory {
    fn id(&self) -> &'static str {
        "silence"
    }

    fn description(&self) -> &'static str {
        "insert silence after every Nth window (window=500, every=4, gap=1.0)"
    }

    fn create(&self, options: &ModifierOptions) -> AudioResult<Box<dyn SampleModifier>> {
        options.ensure_known(self.id(), &["window", "every", "gap"])?;
        Ok(Box::new(SilenceInserter::new(
            options.f64_or("window", 500.0)?,
            options.usize_or("every", 4)?,
            options.f64_or("gap", 1.0)?,
        )?))
    }
}
