use crate::core::PcmFormat;
use crate::error::AudioResult;
use std::io::{BufReader, ErrorKind, Read};

/// Headerless interleaved PCM in a caller-declared format
pub struct RawSource<R: Read> {
    reader: BufReader<R>,
    format: PcmFormat,
}

impl<R: Read> RawSource<R> {
    /// Wrap a reader producing samples in `format`
    pub fn new(reader: R, format: PcmFormat) -> Self {
        RawSource {
            reader: BufReader::new(reader),
            format,
        }
    }

    fn read_sample(&mut self) -> AudioResult<Option<i16>> {
        let mut bytes = [0u8; 2];
        match self.reader.read_exact(&mut bytes) {
            Ok(()) => Ok(Some(self.format.byte_order.decode(bytes))),
            // A half-written trailing sample counts as end of stream
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl<R: Read + Send> super::PcmSource for RawSource<R> {
    fn format(&self) -> PcmFormat {
        self.format
    }

    fn read_pair(&mut self) -> AudioResult<Option<(i16, i16)>> {
        let Some(left) = self.read_sample()? else {
            return Ok(None);
        };
        // A left sample without its right partner is dropped
        let Some(right) = self.read_sample()? else {
            return Ok(None);
        };
        Ok(Some((left, right)))
    }
}
