use super::SinkSpec;
use crate::core::ByteOrder;
use crate::error::{AudioError, AudioResult};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

/// 16-bit stereo WAV sink
pub struct WavSink<W: Write + Seek> {
    writer: Option<WavWriter<W>>,
    byte_order: ByteOrder,
}

impl WavSink<BufWriter<File>> {
    /// Create a WAV file
    pub fn create<P: AsRef<Path>>(path: P, spec: SinkSpec) -> AudioResult<Self> {
        let writer = WavWriter::create(path, Self::wav_spec(spec)).map_err(encode_error)?;
        Ok(WavSink {
            writer: Some(writer),
            byte_order: spec.byte_order,
        })
    }
}

impl<W: Write + Seek> WavSink<W> {
    /// Write WAV data to any seekable writer
    pub fn new(inner: W, spec: SinkSpec) -> AudioResult<Self> {
        let writer = WavWriter::new(inner, Self::wav_spec(spec)).map_err(encode_error)?;
        Ok(WavSink {
            writer: Some(writer),
            byte_order: spec.byte_order,
        })
    }

    fn wav_spec(spec: SinkSpec) -> WavSpec {
        WavSpec {
            channels: 2,
            sample_rate: spec.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }

    /// Get the number of samples written, counting both channels
    pub fn samples_written(&self) -> u32 {
        self.writer.as_ref().map(|w| w.len()).unwrap_or(0)
    }
}

impl<W: Write + Seek> super::PcmSink for WavSink<W> {
    fn write(&mut self, bytes: &[u8]) -> AudioResult<()> {
        if bytes.len() % 2 != 0 {
            return Err(AudioError::EncodeError(format!(
                "buffer of {} bytes does not hold whole 16-bit samples",
                bytes.len()
            )));
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| AudioError::ProcessingError("Sink already finalized".to_string()))?;

        for pair in bytes.chunks_exact(2) {
            let sample = self.byte_order.decode([pair[0], pair[1]]);
            writer.write_sample(sample).map_err(encode_error)?;
        }

        Ok(())
    }

    fn finalize(&mut self) -> AudioResult<()> {
        if let Some(writer) = self.writer.take() {
            writer.finalize().map_err(encode_error)?;
        }
        Ok(())
    }
}

fn encode_error(err: hound::Error) -> AudioError {
    match err {
        hound::Error::IoError(e) => AudioError::Io(e),
        e => AudioError::EncodeError(e.to_string()),
    }
}
