use crate::error::{AudioError, AudioResult};
use std::fmt;

/// Position of a batch in the stream, assigned at read time starting at 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BatchIndex(u64);

impl BatchIndex {
    /// Create an index
    pub const fn new(index: u64) -> Self {
        BatchIndex(index)
    }

    /// Get the raw index
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Index of the following batch
    pub const fn next(self) -> Self {
        BatchIndex(self.0 + 1)
    }
}

impl fmt::Display for BatchIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One window of stereo samples, split per channel.
///
/// Both channels must hold the same number of samples whenever a batch
/// crosses a stage boundary. The fields are public so modifiers can build
/// batches freely; [`ChannelBatch::validate`] is the check the pipeline
/// applies before serializing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelBatch {
    /// Left channel samples
    pub left: Vec<i16>,
    /// Right channel samples
    pub right: Vec<i16>,
}

impl ChannelBatch {
    /// Create a batch, rejecting channels of unequal length
    pub fn new(left: Vec<i16>, right: Vec<i16>) -> AudioResult<Self> {
        let batch = ChannelBatch { left, right };
        batch.validate()?;
        Ok(batch)
    }

    /// Batch with no samples
    pub fn empty() -> Self {
        ChannelBatch::default()
    }

    /// Batch of `len` zero samples on both channels
    pub fn silence(len: usize) -> Self {
        ChannelBatch {
            left: vec![0; len],
            right: vec![0; len],
        }
    }

    /// Samples per channel
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Check if batch is empty
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    /// Fail with [`AudioError::ChannelMismatch`] if the channels differ in length
    pub fn validate(&self) -> AudioResult<()> {
        if self.left.len() != self.right.len() {
            return Err(AudioError::ChannelMismatch {
                left: self.left.len(),
                right: self.right.len(),
            });
        }
        Ok(())
    }

    /// Apply the same transform to each channel independently
    pub fn map_channels<F>(self, mut f: F) -> AudioResult<Self>
    where
        F: FnMut(Vec<i16>) -> AudioResult<Vec<i16>>,
    {
        let left = f(self.left)?;
        let right = f(self.right)?;
        ChannelBatch::new(left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_creation() {
        let batch = ChannelBatch::new(vec![1, 2, 3], vec![4, 5, 6]).unwrap();
        assert_eq!(batch.len(), 3);
        assert!(!batch.is_empty());
    }

    #[test]
    fn test_batch_unequal_channels() {
        let result = ChannelBatch::new(vec![1, 2, 3], vec![4, 5]);
        assert!(matches!(
            result,
            Err(AudioError::ChannelMismatch { left: 3, right: 2 })
        ));
    }

    #[test]
    fn test_map_channels_rejects_uneven_output() {
        let batch = ChannelBatch::new(vec![1, 2], vec![3, 4]).unwrap();
        let mut calls = 0;
        let result = batch.map_channels(|mut samples| {
            calls += 1;
            if calls == 2 {
                samples.pop();
            }
            Ok(samples)
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_silence() {
        let batch = ChannelBatch::silence(4);
        assert_eq!(batch.left, vec![0; 4]);
        assert_eq!(batch.right, vec![0; 4]);
        assert!(ChannelBatch::empty().is_empty());
    }

    #[test]
    fn test_batch_index() {
        let index = BatchIndex::new(4);
        assert_eq!(index.next().get(), 5);
        assert_eq!(index.to_string(), "4");
        assert!(BatchIndex::new(1) < BatchIndex::new(2));
    }
}
