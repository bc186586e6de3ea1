//! PCM byte sinks

pub mod raw;
pub mod wav;

pub use raw::RawSink;
pub use wav::WavSink;

use crate::core::ByteOrder;
use crate::error::AudioResult;

/// What a sink is told about the stream before the first buffer arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkSpec {
    /// Frames per second of the processed stream
    pub sample_rate: u32,
    /// Byte order of the buffers the sink will receive
    pub byte_order: ByteOrder,
}

/// Consumer of interleaved 16-bit stereo byte buffers, in stream order
pub trait PcmSink {
    /// Write one buffer of interleaved samples
    fn write(&mut self, bytes: &[u8]) -> AudioResult<()>;

    /// Finalize output (flush any remaining data)
    fn finalize(&mut self) -> AudioResult<()> {
        Ok(())
    }
}

impl<K: PcmSink + ?Sized> PcmSink for Box<K> {
    fn write(&mut self, bytes: &[u8]) -> AudioResult<()> {
        (**self).write(bytes)
    }

    fn finalize(&mut self) -> AudioResult<()> {
        (**self).finalize()
    }
}
