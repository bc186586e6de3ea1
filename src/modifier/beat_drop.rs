use super::{ModifierOptions, SampleModifier, SampleModifierFactory, SampleSelector, SelectionModifier};
use crate::core::{BatchIndex, SampleSelection};
use crate::error::{AudioError, AudioResult};
use std::collections::BTreeSet;

/// Drops every Nth beat.
///
/// Each batch is one beat long; the last beat of every group of `drop`
/// beats is removed entirely.
#[derive(Debug, Clone)]
pub struct BeatDropper {
    bpm: f64,
    drop: usize,
    beat_ms: f64,
}

impl BeatDropper {
    /// Create a dropper removing one beat out of every `drop` at `bpm`
    pub fn new(bpm: f64, drop: usize) -> AudioResult<Self> {
        let beat_ms = super::beat_ms(bpm)?;
        if drop == 0 {
            return Err(AudioError::ConfigError(
                "drop must be at least 1".to_string(),
            ));
        }
        Ok(BeatDropper { bpm, drop, beat_ms })
    }

    fn is_dropped(&self, index: BatchIndex) -> bool {
        index.get() % self.drop as u64 == self.drop as u64 - 1
    }
}

impl SampleSelector for BeatDropper {
    fn requested_window_ms(&self) -> f64 {
        self.beat_ms
    }

    fn select_samples(&self, len: usize, index: BatchIndex) -> AudioResult<BTreeSet<SampleSelection>> {
        let mut selections = BTreeSet::new();
        if !self.is_dropped(index) {
            selections.insert(SampleSelection::new(0, len)?);
        }
        Ok(selections)
    }

    fn describe_modification(&self) -> String {
        format!("drop every {} of {} BPM", self.drop, self.bpm)
    }
}

/// Factory for [`BeatDropper`]
pub struct BeatDropFactory;

impl SampleModifierFactory for BeatDropFactory {
    fn id(&self) -> &'static str {
        "beat-drop"
    }

    fn description(&self) -> &'static str {
        "drop every Nth beat (bpm=120, drop=2)"
    }

    fn create(&self, options: &ModifierOptions) -> AudioResult<Box<dyn SampleModifier>> {
        options.ensure_known(self.id(), &["bpm", "drop"])?;
        let dropper = BeatDropper::new(options.f64_or("bpm", 120.0)?, options.usize_or("drop", 2)?)?;
        Ok(Box::new(SelectionModifier::new(dropper)))
    }
}
