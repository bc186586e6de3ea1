//! Sample modifiers: the per-batch transforms applied by the pipeline

pub mod beat_drop;
pub mod identity;
pub mod normalize;
pub mod registry;
pub mod reverse;
pub mod selection;
pub mod silence;
pub mod stretch;
pub mod trim;

pub use beat_drop::BeatDropper;
pub use identity::Identity;
pub use normalize::Normalize;
pub use registry::ModifierRegistry;
pub use reverse::Reverse;
pub use selection::{SampleSelector, SelectionModifier};
pub use silence::SilenceInserter;
pub use stretch::Stretch;
pub use trim::Trim;

use crate::core::{BatchIndex, ChannelBatch};
use crate::error::{AudioError, AudioResult};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Trait for per-batch sample transforms.
///
/// `modify` may be called concurrently for different batches in any order,
/// so implementations must not rely on state carried between calls. The
/// batch index is the only context a call receives.
pub trait SampleModifier: Send + Sync {
    /// Window length in milliseconds this modifier wants to see per batch
    fn requested_window_ms(&self) -> f64;

    /// Transform one batch; the result may be longer or shorter than the input
    fn modify(&self, batch: ChannelBatch, index: BatchIndex) -> AudioResult<ChannelBatch>;

    /// Short human readable label, used in output file names
    fn describe_modification(&self) -> String;
}

/// Builds a [`SampleModifier`] from user supplied options
pub trait SampleModifierFactory: Send + Sync {
    /// Registry key
    fn id(&self) -> &'static str;

    /// One line summary for listings
    fn description(&self) -> &'static str;

    /// Create a modifier instance
    fn create(&self, options: &ModifierOptions) -> AudioResult<Box<dyn SampleModifier>>;
}

/// `key=value` options handed to a factory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModifierOptions {
    values: BTreeMap<String, String>,
}

impl ModifierOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `key=value` arguments
    pub fn parse<I, S>(args: I) -> AudioResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = ModifierOptions::new();
        for arg in args {
            let arg = arg.as_ref();
            let (key, value) = arg.split_once('=').ok_or_else(|| {
                AudioError::ConfigError(format!("expected key=value, got '{}'", arg))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(AudioError::ConfigError(format!("missing key in '{}'", arg)));
            }
            options.values.insert(key.to_string(), value.trim().to_string());
        }
        Ok(options)
    }

    /// Set an option
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    /// Raw value of an option
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Fail on any key outside `known`
    pub fn ensure_known(&self, modifier: &str, known: &[&str]) -> AudioResult<()> {
        match self.values.keys().find(|key| !known.contains(&key.as_str())) {
            Some(key) => Err(AudioError::ConfigError(format!(
                "unknown option '{}' for {} (expected one of: {})",
                key,
                modifier,
                known.join(", ")
            ))),
            None => Ok(()),
        }
    }

    /// Float option, or `default` when absent
    pub fn f64_or(&self, key: &str, default: f64) -> AudioResult<f64> {
        self.parsed_or(key, default)
    }

    /// Unsigned integer option, or `default` when absent
    pub fn usize_or(&self, key: &str, default: usize) -> AudioResult<usize> {
        self.parsed_or(key, default)
    }

    fn parsed_or<T: FromStr>(&self, key: &str, default: T) -> AudioResult<T> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|_| {
                AudioError::ConfigError(format!("invalid value '{}' for option '{}'", raw, key))
            }),
        }
    }
}

/// Longest window a modifier may request, one minute
pub const MAX_WINDOW_MS: f64 = 60_000.0;

/// Largest growth or shrink ratio a modifier may apply to a window
pub const MAX_RATIO: f64 = 16.0;

/// Validate a window length option
pub(crate) fn positive_ms(name: &str, ms: f64) -> AudioResult<f64> {
    if !ms.is_finite() || ms <= 0.0 {
        return Err(AudioError::ConfigError(format!(
            "{} must be a positive number of milliseconds, got {}",
            name, ms
        )));
    }
    if ms > MAX_WINDOW_MS {
        return Err(AudioError::ConfigError(format!(
            "{} of {} ms exceeds the {} ms limit",
            name, ms, MAX_WINDOW_MS
        )));
    }
    Ok(ms)
}

/// Length of one beat in milliseconds
pub(crate) fn beat_ms(bpm: f64) -> AudioResult<f64> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(AudioError::ConfigError(format!(
            "BPM must be positive, got {}",
            bpm
        )));
    }
    positive_ms("beat", 60_000.0 / bpm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options() {
        let options = ModifierOptions::parse(["bpm=128", " drop = 3 "]).unwrap();
        assert_eq!(options.f64_or("bpm", 120.0).unwrap(), 128.0);
        assert_eq!(options.usize_or("drop", 2).unwrap(), 3);
        assert_eq!(options.usize_or("missing", 7).unwrap(), 7);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ModifierOptions::parse(["bpm"]).is_err());
        assert!(ModifierOptions::parse(["=4"]).is_err());
    }

    #[test]
    fn test_invalid_value() {
        let options = ModifierOptions::new().with("drop", "many");
        assert!(matches!(
            options.usize_or("drop", 2),
            Err(AudioError::ConfigError(_))
        ));
    }

    #[test]
    fn test_unknown_option() {
        let options = ModifierOptions::new().with("bpm", 100).with("tempo", 2);
        assert!(options.ensure_known("beat-drop", &["bpm", "drop"]).is_err());
        assert!(options.ensure_known("beat-drop", &["bpm", "tempo"]).is_ok());
    }

    #[test]
    fn test_beat_ms() {
        assert_eq!(beat_ms(120.0).unwrap(), 500.0);
        assert!(beat_ms(0.0).is_err());
        assert!(positive_ms("window", -1.0).is_err());
        // Below 1 BPM a beat is longer than a minute
        assert!(beat_ms(0.5).is_err());
    }

    #[test]
    fn test_window_limit() {
        assert_eq!(positive_ms("window", MAX_WINDOW_MS).unwrap(), MAX_WINDOW_MS);
        assert!(matches!(
            positive_ms("window", 1e12),
            Err(AudioError::ConfigError(_))
        ));
    }
}
