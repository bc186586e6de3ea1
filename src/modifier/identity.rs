use super::{ModifierOptions, SampleModifier, SampleModifierFactory};
use crate::core::{BatchIndex, ChannelBatch};
use crate::error::AudioResult;

/// Passes every batch through unchanged
#[derive(Debug, Clone)]
pub struct Identity {
    window_ms: f64,
}

impl Identity {
    /// Create a pass-through modifier with the given window
    pub fn new(window_ms: f64) -> AudioResult<Self> {
        Ok(Identity {
            window_ms: super::positive_ms("window", window_ms)?,
        })
    }
}

impl SampleModifier for Identity {
    fn requested_window_ms(&self) -> f64 {
        self.window_ms
    }

    fn modify(&self, batch: ChannelBatch, _index: BatchIndex) -> AudioResult<ChannelBatch> {
        Ok(batch)
    }

    fn describe_modification(&self) -> String {
        "unmodified".to_string()
    }
}

/// Factory for [`Identity`]
pub struct IdentityFactory;

impl SampleModifierFactory for IdentityFactory {
    fn id(&self) -> &'static str {
        "identity"
    }

    fn description(&self) -> &'static str {
        "copy the audio unchanged (window=100)"
    }

    fn create(&self, options: &ModifierOptions) -> AudioResult<Box<dyn SampleModifier>> {
        options.ensure_known(self.id(), &["window"])?;
        Ok(Box::new(Identity::new(options.f64_or("window", 100.0)?)?))
    }
}
