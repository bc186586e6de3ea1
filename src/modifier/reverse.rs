use super::{ModifierOptions, SampleModifier, SampleModifierFactory};
use crate::core::{BatchIndex, ChannelBatch};
use crate::error::AudioResult;

/// Plays every window backwards
#[derive(Debug, Clone)]
pub struct Reverse {
    window_ms: f64,
}

impl Reverse {
    /// Create a reverser with the given window
    pub fn new(window_ms: f64) -> AudioResult<Self> {
        Ok(Reverse {
            window_ms: super::positive_ms("window", window_ms)?,
        })
    }
}

impl SampleModifier for Reverse {
    fn requested_window_ms(&self) -> f64 {
        self.window_ms
    }

    fn modify(&self, batch: ChannelBatch, _index: BatchIndex) -> AudioResult<ChannelBatch> {
        batch.map_channels(|mut samples| {
            samples.reverse();
            Ok(samples)
        })
    }

    fn describe_modification(&self) -> String {
        format!("reversed every {} ms", self.window_ms)
    }
}

/// Factory for [`Reverse`]
pub struct ReverseFactory;

impl SampleModifierFactory for ReverseFactory {
    fn id(&self) -> &'static str {
        "reverse"
    }

    fn description(&self) -> &'static str {
        "reverse each window (window=500)"
    }

    fn create(&self, options: &ModifierOptions) -> AudioResult<Box<dyn SampleModifier>> {
        options.ensure_known(self.id(), &["window"])?;
        Ok(Box::new(Reverse::new(options.f64_or("window", 500.0)?)?))
    }
}
