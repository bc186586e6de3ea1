use crate::core::{BatchIndex, ChannelBatch};
use crate::error::AudioResult;
use crate::source::PcmSource;

/// Splits a PCM source into fixed-length [`ChannelBatch`] windows.
///
/// Every batch except the last holds exactly `window` samples per channel.
/// A stream ending mid-window yields a final, shorter batch; a stream
/// ending on a window boundary yields no empty trailing batch.
pub struct BatchReader<S> {
    source: S,
    window: usize,
    /// Reusable scratch buffers, grown as samples arrive and never handed out
    left: Vec<i16>,
    right: Vec<i16>,
    next_index: BatchIndex,
    finished: bool,
}

impl<S: PcmSource> BatchReader<S> {
    /// Create a reader producing windows of `window` samples per channel
    pub fn new(source: S, window: usize) -> Self {
        BatchReader {
            source,
            window,
            left: Vec::new(),
            right: Vec::new(),
            next_index: BatchIndex::default(),
            finished: window == 0,
        }
    }

    /// Samples per channel in a full window
    pub fn window(&self) -> usize {
        self.window
    }

    /// Index the next batch will carry
    pub fn next_index(&self) -> BatchIndex {
        self.next_index
    }

    /// Fill the scratch buffers, returning how many pairs were read
    fn fill(&mut self) -> AudioResult<usize> {
        self.left.clear();
        self.right.clear();
        while self.left.len() < self.window {
            match self.source.read_pair()? {
                Some((left, right)) => {
                    self.left.push(left);
                    self.right.push(right);
                }
                None => {
                    self.finished = true;
                    break;
                }
            }
        }
        Ok(self.left.len())
    }
}

impl<S: PcmSource> Iterator for BatchReader<S> {
    type Item = AudioResult<(BatchIndex, ChannelBatch)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let read = match self.fill() {
            Ok(read) => read,
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        };
        if read == 0 {
            return None;
        }

        // Copy out so the batch owns its samples outright
        let batch = ChannelBatch {
            left: self.left[..read].to_vec(),
            right: self.right[..read].to_vec(),
        };
        let index = self.next_index;
        self.next_index = index.next();
        Some(Ok((index, batch)))
    }
}
