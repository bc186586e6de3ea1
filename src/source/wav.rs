use crate::core::{ByteOrder, PcmFormat};
use crate::error::{AudioError, AudioResult};
use hound::{SampleFormat, WavReader};
use log::warn;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// 16-bit integer WAV source
pub struct WavSource<R: Read> {
    reader: WavReader<R>,
    format: PcmFormat,
}

impl WavSource<BufReader<File>> {
    /// Open a WAV file
    pub fn open<P: AsRef<Path>>(path: P) -> AudioResult<Self> {
        let reader = WavReader::open(path)?;
        Self::from_reader(reader)
    }
}

impl<R: Read> WavSource<R> {
    /// Parse a WAV stream from any reader
    pub fn new(inner: R) -> AudioResult<Self> {
        let reader = WavReader::new(inner)?;
        Self::from_reader(reader)
    }

    fn from_reader(reader: WavReader<R>) -> AudioResult<Self> {
        let spec = reader.spec();
        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(AudioError::UnsupportedFormat(format!(
                "{}-bit {:?} samples, expected 16-bit integer PCM",
                spec.bits_per_sample, spec.sample_format
            )));
        }

        // WAV data is always little-endian
        let format = PcmFormat::new(spec.sample_rate, spec.channels, ByteOrder::Little)?;

        Ok(WavSource { reader, format })
    }

    /// Samples per channel declared in the header
    pub fn duration(&self) -> u32 {
        self.reader.duration()
    }

    fn next_sample(&mut self) -> AudioResult<Option<i16>> {
        match self.reader.samples::<i16>().next() {
            None => Ok(None),
            Some(Ok(sample)) => Ok(Some(sample)),
            // Data chunk shorter than its header claims
            Some(Err(hound::Error::IoError(e))) if e.kind() == ErrorKind::UnexpectedEof => {
                warn!("WAV data ends before its declared length, stopping early");
                Ok(None)
            }
            Some(Err(e)) => Err(e.into()),
        }
    }
}

impl<R: Read + Send> super::PcmSource for WavSource<R> {
    fn format(&self) -> PcmFormat {
        self.format
    }

    fn read_pair(&mut self) -> AudioResult<Option<(i16, i16)>> {
        let Some(left) = self.next_sample()? else {
            return Ok(None);
        };
        let Some(right) = self.next_sample()? else {
            return Ok(None);
        };
        Ok(Some((left, right)))
    }
}
