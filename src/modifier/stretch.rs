use super::{ModifierOptions, SampleModifier, SampleModifierFactory};
use crate::core::{BatchIndex, ChannelBatch};
use crate::error::{AudioError, AudioResult};

/// Time stretcher - changes the length of each window using linear interpolation.
///
/// A factor above 1.0 speeds the window up (fewer samples), below 1.0 slows
/// it down. Pitch shifts along with the tempo.
#[derive(Debug, Clone)]
pub struct Stretch {
    window_ms: f64,
    factor: f64,
}

impl Stretch {
    /// Create a new stretcher
    ///
    /// # Arguments
    /// * `window_ms` - Window length in milliseconds
    /// * `factor` - Tempo factor; each window becomes `len / factor` samples long
    pub fn new(window_ms: f64, factor: f64) -> AudioResult<Self> {
        let window_ms = super::positive_ms("window", window_ms)?;
        let max = super::MAX_RATIO;
        if !factor.is_finite() || factor < 1.0 / max || factor > max {
            return Err(AudioError::ConfigError(format!(
                "Stretch factor must be between 1/{} and {}, got {}",
                max, max, factor
            )));
        }

        Ok(Stretch { window_ms, factor })
    }

    /// Get the tempo factor
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Samples produced for an input of `len` samples
    fn output_len(&self, len: usize) -> usize {
        (len as f64 / self.factor).round() as usize
    }

    /// Linear interpolation stretch to exactly `output_len` samples
    fn linear_stretch(input: &[i16], factor: f64, output_len: usize) -> Vec<i16> {
        if input.is_empty() {
            return Vec::new();
        }

        let mut output = Vec::with_capacity(output_len);
        let last = input.len() - 1;

        for i in 0..output_len {
            let input_pos = i as f64 * factor;
            let input_idx = input_pos.floor() as usize;

            if input_idx < last {
                // Linear interpolation between two samples
                let frac = input_pos - input_idx as f64;
                let sample = input[input_idx] as f64 * (1.0 - frac) + input[input_idx + 1] as f64 * frac;
                output.push(sample.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16);
            } else {
                // Past the end: hold the last sample
                output.push(input[last]);
            }
        }

        output
    }
}

impl SampleModifier for Stretch {
    fn requested_window_ms(&self) -> f64 {
        self.window_ms
    }

    fn modify(&self, batch: ChannelBatch, _index: BatchIndex) -> AudioResult<ChannelBatch> {
        if self.factor == 1.0 {
            return Ok(batch);
        }

        let output_len = self.output_len(batch.len());
        batch.map_channels(|samples| Ok(Self::linear_stretch(&samples, self.factor, output_len)))
    }

    fn describe_modification(&self) -> String {
        format!("stretched x{}", self.factor)
    }
}

/// Factory for [`Stretch`]
pub struct StretchFactory;

impl SampleModifierFactory for StretchFactory {
    fn id(&self) -> &'static str {
        "stretch"
    }

    fn description(&self) -> &'static str {
        "time-stretch each window (window=250, factor=1.25)"
    }

    fn create(&self, options: &ModifierOptions) -> AudioResult<Box<dyn SampleModifier>> {
        options.ensure_known(self.id(), &["window", "factor"])?;
        Ok(Box::new(Stretch::new(
            options.f64_or("window", 250.0)?,
            options.f64_or("factor", 1.25)?,
        )?))
    }
}
