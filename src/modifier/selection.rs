use super::SampleModifier;
use crate::core::{BatchIndex, ChannelBatch, SampleSelection};
use crate::error::AudioResult;
use std::collections::BTreeSet;

/// Chooses which ranges of each batch to keep
pub trait SampleSelector: Send + Sync {
    /// Window length in milliseconds
    fn requested_window_ms(&self) -> f64;

    /// Ranges of a batch of `len` samples to keep, in output order
    fn select_samples(&self, len: usize, index: BatchIndex) -> AudioResult<BTreeSet<SampleSelection>>;

    /// Short human readable label
    fn describe_modification(&self) -> String;
}

/// Modifier that keeps only the selected ranges of every batch.
///
/// Both channels are cut with the same selections, so they stay aligned.
pub struct SelectionModifier<S> {
    selector: S,
}

impl<S: SampleSelector> SelectionModifier<S> {
    /// Wrap a selector
    pub fn new(selector: S) -> Self {
        SelectionModifier { selector }
    }

    /// Get the wrapped selector
    pub fn selector(&self) -> &S {
        &self.selector
    }
}

impl<S: SampleSelector> SampleModifier for SelectionModifier<S> {
    fn requested_window_ms(&self) -> f64 {
        self.selector.requested_window_ms()
    }

    fn modify(&self, batch: ChannelBatch, index: BatchIndex) -> AudioResult<ChannelBatch> {
        let selections = self.selector.select_samples(batch.len(), index)?;
        batch.map_channels(|samples| SampleSelection::extract(samples, &selections))
    }

    fn describe_modification(&self) -> String {
        self.selector.describe_modification()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Keeps the first and last sample of every batch
    struct Edges;

    impl SampleSelector for Edges {
        fn requested_window_ms(&self) -> f64 {
            10.0
        }

        fn select_samples(
            &self,
            len: usize,
            _index: BatchIndex,
        ) -> AudioResult<BTreeSet<SampleSelection>> {
            let mut set = BTreeSet::new();
            if len > 0 {
                set.insert(SampleSelection::new(len - 1, len)?);
                set.insert(SampleSelection::new(0, 1)?);
            }
            Ok(set)
        }

        fn describe_modification(&self) -> String {
            "edges".to_string()
        }
    }

    #[test]
    fn test_selection_modifier_cuts_both_channels() {
        let modifier = SelectionModifier::new(Edges);
        let batch = ChannelBatch::new(vec![1, 2, 3, 4], vec![5, 6, 7, 8]).unwrap();

        let result = modifier.modify(batch, BatchIndex::new(0)).unwrap();
        assert_eq!(result.left, vec![1, 4]);
        assert_eq!(result.right, vec![5, 8]);
        assert_eq!(modifier.describe_modification(), "edges");
    }

    #[test]
    fn test_selection_modifier_empty_batch() {
        let modifier = SelectionModifier::new(Edges);
        let result = modifier
            .modify(ChannelBatch::empty(), BatchIndex::new(3))
            .unwrap();
        assert!(result.is_empty());
    }
}
