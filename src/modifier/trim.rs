use super::{ModifierOptions, SampleModifier, SampleModifierFactory, SampleSelector, SelectionModifier};
use crate::core::{BatchIndex, SampleSelection};
use crate::error::{AudioError, AudioResult};
use std::collections::BTreeSet;

/// Keeps the leading fraction of every beat
#[derive(Debug, Clone)]
pub struct Trim {
    bpm: f64,
    keep: f64,
    beat_ms: f64,
}

impl Trim {
    /// Create a trimmer keeping `keep` (0, 1] of each beat at `bpm`
    pub fn new(bpm: f64, keep: f64) -> AudioResult<Self> {
        let beat_ms = super::beat_ms(bpm)?;
        if !(keep > 0.0 && keep <= 1.0) {
            return Err(AudioError::ConfigError(format!(
                "keep must be between 0.0 and 1.0, got {}",
                keep
            )));
        }
        Ok(Trim { bpm, keep, beat_ms })
    }
}

impl SampleSelector for Trim {
    fn requested_window_ms(&self) -> f64 {
        self.beat_ms
    }

    fn select_samples(&self, len: usize, _index: BatchIndex) -> AudioResult<BTreeSet<SampleSelection>> {
        let kept = ((len as f64 * self.keep).floor() as usize).min(len);
        Ok(BTreeSet::from([SampleSelection::new(0, kept)?]))
    }

    fn describe_modification(&self) -> String {
        format!("keep {}% of {} BPM", (self.keep * 100.0).round(), self.bpm)
    }
}

/// Factory for [`Trim`]
pub struct TrimFactory;

impl SampleModifierFactory for TrimFactory {
    fn id(&self) -> &'static str {
        "trim"
    }

    fn description(&self) -> &'static str {
        "keep the leading part of every beat (bpm=120, keep=0.5)"
    }

    fn create(&self, options: &ModifierOptions) -> AudioResult<Box<dyn SampleModifier>> {
        options.ensure_known(self.id(), &["bpm", "keep"])?;
        let trim = Trim::new(options.f64_or("bpm", 120.0)?, options.f64_or("keep", 0.5)?)?;
        Ok(Box::new(SelectionModifier::new(trim)))
    }
}
