use crate::core::BatchIndex;
use std::io;
use thiserror::Error;

/// Result type for audio operations
pub type AudioResult<T> = Result<T, AudioError>;

/// Error types for the sample processing pipeline
#[derive(Error, Debug)]
pub enum AudioError {
    /// IO error on the PCM source or sink
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Input is not 16-bit integer PCM
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Reading the input container failed
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Writing the output container failed
    #[error("Encode error: {0}")]
    EncodeError(String),

    /// Invalid channel configuration
    #[error("Invalid channel configuration: expected {expected}, got {got}")]
    InvalidChannels {
        /// Expected number of channels
        expected: u16,
        /// Got number of channels
        got: u16,
    },

    /// Invalid sample rate
    #[error("Invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate
        rate: u32,
    },

    /// Left and right channels of a batch have different lengths.
    ///
    /// Always a modifier bug; never retried or repaired.
    #[error("Channel sizes should be equal, {left} != {right}")]
    ChannelMismatch {
        /// Samples in the left channel
        left: usize,
        /// Samples in the right channel
        right: usize,
    },

    /// A modifier failed (or panicked) while transforming a batch
    #[error("Transform of batch {index} failed: {message}")]
    TransformFailed {
        /// Batch that failed
        index: BatchIndex,
        /// Failure description
        message: String,
    },

    /// No modifier registered under the given id
    #[error("No factory by the ID '{0}'")]
    UnknownModifier(String),

    /// Malformed sample selection
    #[error("Invalid sample selection [{low}, {high})")]
    InvalidSelection {
        /// Low bound (inclusive)
        low: usize,
        /// High bound (exclusive)
        high: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal pipeline failure
    #[error("Processing error: {0}")]
    ProcessingError(String),
}

impl From<hound::Error> for AudioError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => AudioError::Io(e),
            hound::Error::Unsupported => {
                AudioError::UnsupportedFormat("unsupported WAV encoding".to_string())
            }
            e => AudioError::DecodeError(e.to_string()),
        }
    }
}
