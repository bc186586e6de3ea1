//! PCM sample sources

pub mod raw;
pub mod wav;

pub use raw::RawSource;
pub use wav::WavSource;

use crate::core::PcmFormat;
use crate::error::AudioResult;
use std::fs::File;
use std::path::Path;

/// Blocking source of interleaved 16-bit stereo samples
pub trait PcmSource: Send {
    /// Format of the stream
    fn format(&self) -> PcmFormat;

    /// Read the next (left, right) sample pair.
    ///
    /// Returns `Ok(None)` at end of stream; errors are genuine I/O failures.
    fn read_pair(&mut self) -> AudioResult<Option<(i16, i16)>>;
}

impl<S: PcmSource + ?Sized> PcmSource for Box<S> {
    fn format(&self) -> PcmFormat {
        (**self).format()
    }

    fn read_pair(&mut self) -> AudioResult<Option<(i16, i16)>> {
        (**self).read_pair()
    }
}

/// Open a source from a file path.
///
/// `.wav` files are parsed with their header; anything else is read as
/// headerless PCM in `raw_format`.
pub fn open_file<P: AsRef<Path>>(
    path: P,
    raw_format: PcmFormat,
) -> AudioResult<Box<dyn PcmSource>> {
    let path = path.as_ref();
    let is_wav = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));

    if is_wav {
        WavSource::open(path).map(|s| Box::new(s) as Box<dyn PcmSource>)
    } else {
        let file = File::open(path)?;
        Ok(Box::new(RawSource::new(file, raw_format)))
    }
}
