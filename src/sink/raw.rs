use crate::error::{AudioError, AudioResult};
use std::io::{BufWriter, Write};

/// Writes buffers verbatim as headerless PCM
pub struct RawSink<W: Write> {
    writer: BufWriter<W>,
    bytes_written: u64,
}

impl<W: Write> RawSink<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        RawSink {
            writer: BufWriter::new(writer),
            bytes_written: 0,
        }
    }

    /// Get the number of bytes written
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flush and return the inner writer
    pub fn into_inner(self) -> AudioResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| AudioError::Io(e.into_error()))
    }
}

impl<W: Write> super::PcmSink for RawSink<W> {
    fn write(&mut self, bytes: &[u8]) -> AudioResult<()> {
        self.writer.write_all(bytes)?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    fn finalize(&mut self) -> AudioResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::PcmSink;

    #[test]
    fn test_raw_sink_writes_in_order() {
        let mut sink = RawSink::new(Vec::new());
        sink.write(&[1, 2, 3, 4]).unwrap();
        sink.write(&[]).unwrap();
        sink.write(&[5, 6, 7, 8]).unwrap();
        sink.finalize().unwrap();

        assert_eq!(sink.bytes_written(), 8);
        assert_eq!(sink.into_inner().unwrap(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
