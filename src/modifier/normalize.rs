use super::{ModifierOptions, SampleModifier, SampleModifierFactory};
use crate::core::{BatchIndex, ChannelBatch};
use crate::error::{AudioError, AudioResult};

/// Peak normalization per window
#[derive(Clone, Debug)]
pub struct Normalize {
    window_ms: f64,
    /// Target peak level (0.0 to 1.0 of full scale)
    target_peak: f64,
}

impl Normalize {
    /// Create a peak normalizer
    pub fn peak(window_ms: f64, target_peak: f64) -> AudioResult<Self> {
        let window_ms = super::positive_ms("window", window_ms)?;
        if !(target_peak > 0.0 && target_peak <= 1.0) {
            return Err(AudioError::ConfigError(format!(
                "Target peak must be between 0.0 and 1.0, got {}",
                target_peak
            )));
        }

        Ok(Normalize {
            window_ms,
            target_peak,
        })
    }

    /// Calculate peak magnitude of samples
    fn calculate_peak(samples: &[i16]) -> u16 {
        samples.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0)
    }

    /// Apply gain to all samples, clipping at full scale
    fn apply_gain(samples: &[i16], gain: f64) -> Vec<i16> {
        samples
            .iter()
            .map(|&s| (s as f64 * gain).round().clamp(i16::MIN as f64, i16::MAX as f64) as i16)
            .collect()
    }
}

impl SampleModifier for Normalize {
    fn requested_window_ms(&self) -> f64 {
        self.window_ms
    }

    fn modify(&self, batch: ChannelBatch, _index: BatchIndex) -> AudioResult<ChannelBatch> {
        // Both channels share one gain so the stereo image is kept
        let peak = Self::calculate_peak(&batch.left).max(Self::calculate_peak(&batch.right));
        if peak == 0 {
            return Ok(batch);
        }

        let gain = self.target_peak * i16::MAX as f64 / peak as f64;
        ChannelBatch::new(
            Self::apply_gain(&batch.left, gain),
            Self::apply_gain(&batch.right, gain),
        )
    }

    fn describe_modification(&self) -> String {
        format!("normalized to {}%", (self.target_peak * 100.0).round())
    }
}

/// Factory for [`Normalize`]
pub struct NormalizeFactory;

impl SampleModifierFactory for NormalizeFactory {
    fn id(&self) -> &'static str {
        "normalize"
    }

    fn description(&self) -> &'static str {
        "peak-normalize each window (window=1000, peak=0.9)"
    }

    fn create(&self, options: &ModifierOptions) -> AudioResult<Box<dyn SampleModifier>> {
        options.ensure_known(self.id(), &["window", "peak"])?;
        Ok(Box::new(Normalize::peak(
            options.f64_or("window", 1000.0)?,
            options.f64_or("peak", 0.9)?,
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_normalization() {
        let normalizer = Normalize::peak(100.0, 1.0).unwrap();

        let batch = ChannelBatch::new(vec![0, 8192, -16384], vec![100, -100, 4096]).unwrap();
        let result = normalizer.modify(batch, BatchIndex::new(0)).unwrap();

        // Joint peak of 16384 is scaled up to full scale
        assert_eq!(Normalize::calculate_peak(&result.left), i16::MAX as u16);
        assert_eq!(result.left[1], 16384);
        assert_eq!(result.right[2], 8192);
    }

    #[test]
    fn test_silence_handling() {
        let normalizer = Normalize::peak(100.0, 0.8).unwrap();

        let batch = ChannelBatch::silence(3);
        // Should handle silence gracefully (no division by zero)
        let result = normalizer.modify(batch.clone(), BatchIndex::new(0)).unwrap();
        assert_eq!(result, batch);
    }

    #[test]
    fn test_extreme_sample() {
        let normalizer = Normalize::peak(100.0, 0.5).unwrap();
        let batch = ChannelBatch::new(vec![i16::MIN], vec![0]).unwrap();
        let result = normalizer.modify(batch, BatchIndex::new(0)).unwrap();
        assert!(result.left[0] < -16000 && result.left[0] > -16500);
    }

    #[test]
    fn test_invalid_target() {
        assert!(Normalize::peak(100.0, 0.0).is_err());
        assert!(Normalize::peak(100.0, 1.1).is_err());
    }
}
