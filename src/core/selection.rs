use crate::error::{AudioError, AudioResult};
use std::cmp::Ordering;

/// Half-open range `[low, high)` of sample offsets within a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleSelection {
    low: usize,
    high: usize,
}

impl SampleSelection {
    /// Create a selection; the low end cannot be bigger than the high end
    pub fn new(low: usize, high: usize) -> AudioResult<Self> {
        if low > high {
            return Err(AudioError::InvalidSelection { low, high });
        }
        Ok(SampleSelection { low, high })
    }

    /// Inclusive low bound
    pub fn low(&self) -> usize {
        self.low
    }

    /// Exclusive high bound
    pub fn high(&self) -> usize {
        self.high
    }

    /// Number of selected samples
    pub fn len(&self) -> usize {
        self.high - self.low
    }

    /// Check if the selection is empty
    pub fn is_empty(&self) -> bool {
        self.low == self.high
    }

    /// Concatenate the selected ranges of `samples`, in iteration order.
    ///
    /// When the selections cover exactly as many samples as the input holds,
    /// the input is returned untouched.
    pub fn extract<'a, I>(samples: Vec<i16>, selections: I) -> AudioResult<Vec<i16>>
    where
        I: IntoIterator<Item = &'a SampleSelection> + Clone,
    {
        let mut total = 0;
        for selection in selections.clone() {
            if selection.high > samples.len() {
                return Err(AudioError::InvalidSelection {
                    low: selection.low,
                    high: selection.high,
                });
            }
            total += selection.len();
        }
        if total == samples.len() {
            return Ok(samples);
        }

        let mut extracted = Vec::with_capacity(total);
        for selection in selections {
            extracted.extend_from_slice(&samples[selection.low..selection.high]);
        }
        Ok(extracted)
    }
}

impl Ord for SampleSelection {
    fn cmp(&self, other: &Self) -> Ordering {
        self.high
            .cmp(&other.high)
            .then_with(|| self.low.cmp(&other.low))
    }
}

impl PartialOrd for SampleSelection {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
