use crate::core::{ByteOrder, ChannelBatch};
use crate::error::AudioResult;

/// Serializes batches into interleaved 16-bit byte buffers (`L0 R0 L1 R1 ...`)
#[derive(Debug, Clone, Copy)]
pub struct ByteGather {
    order: ByteOrder,
}

impl ByteGather {
    /// Create a gatherer writing samples in `order`
    pub fn new(order: ByteOrder) -> Self {
        ByteGather { order }
    }

    /// Get the output byte order
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Encode one batch. Channels of unequal length are rejected, never padded.
    pub fn gather(&self, batch: &ChannelBatch) -> AudioResult<Vec<u8>> {
        batch.validate()?;

        let mut buffer = Vec::with_capacity(batch.len() * 4);
        for (&left, &right) in batch.left.iter().zip(&batch.right) {
            buffer.extend_from_slice(&self.order.encode(left));
            buffer.extend_from_slice(&self.order.encode(right));
        }
        Ok(buffer)
    }
}
