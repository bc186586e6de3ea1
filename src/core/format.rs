use crate::error::{AudioError, AudioResult};

/// Byte order of 16-bit samples in a PCM byte stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Most significant byte first
    Big,
    /// Least significant byte first
    Little,
}

impl ByteOrder {
    /// Serialize one sample
    pub fn encode(self, sample: i16) -> [u8; 2] {
        match self {
            ByteOrder::Big => sample.to_be_bytes(),
            ByteOrder::Little => sample.to_le_bytes(),
        }
    }

    /// Deserialize one sample
    pub fn decode(self, bytes: [u8; 2]) -> i16 {
        match self {
            ByteOrder::Big => i16::from_be_bytes(bytes),
            ByteOrder::Little => i16::from_le_bytes(bytes),
        }
    }

    /// Get byte order name
    pub fn name(self) -> &'static str {
        match self {
            ByteOrder::Big => "big-endian",
            ByteOrder::Little => "little-endian",
        }
    }
}

/// Format of an interleaved 16-bit PCM stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    /// Frames per second
    pub sample_rate: u32,
    /// Number of interleaved channels
    pub channels: u16,
    /// Sample byte order
    pub byte_order: ByteOrder,
}

impl PcmFormat {
    /// Create a format, rejecting a zero sample rate
    pub fn new(sample_rate: u32, channels: u16, byte_order: ByteOrder) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }

        Ok(PcmFormat {
            sample_rate,
            channels,
            byte_order,
        })
    }

    /// Samples per channel in a window of `requested_ms` milliseconds, rounded down
    pub fn window_samples(&self, requested_ms: f64) -> usize {
        let samples = requested_ms * self.sample_rate as f64 / 1000.0;
        if samples.is_finite() && samples > 0.0 {
            samples.floor() as usize
        } else {
            0
        }
    }

    /// Fail unless the stream carries exactly two channels
    pub fn require_stereo(&self) -> AudioResult<()> {
        if self.channels != 2 {
            return Err(AudioError::InvalidChannels {
                expected: 2,
                got: self.channels,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_order_encoding() {
        assert_eq!(ByteOrder::Big.encode(0x0102), [0x01, 0x02]);
        assert_eq!(ByteOrder::Little.encode(0x0102), [0x02, 0x01]);
        assert_eq!(ByteOrder::Big.decode([0xff, 0xfe]), -2);
        assert_eq!(ByteOrder::Little.decode([0xfe, 0xff]), -2);
    }

    #[test]
    fn test_window_samples() {
        let format = PcmFormat::new(44100, 2, ByteOrder::Little).unwrap();
        assert_eq!(format.window_samples(1000.0), 44100);
        assert_eq!(format.window_samples(500.0), 22050);
        // 0.1 ms at 44.1 kHz is 4.41 samples
        assert_eq!(format.window_samples(0.1), 4);
        assert_eq!(format.window_samples(0.0), 0);
        assert_eq!(format.window_samples(-5.0), 0);
        assert_eq!(format.window_samples(f64::NAN), 0);
    }

    #[test]
    fn test_invalid_sample_rate() {
        assert!(PcmFormat::new(0, 2, ByteOrder::Big).is_err());
    }

    #[test]
    fn test_require_stereo() {
        let stereo = PcmFormat::new(8000, 2, ByteOrder::Big).unwrap();
        assert!(stereo.require_stereo().is_ok());

        let mono = PcmFormat::new(8000, 1, ByteOrder::Big).unwrap();
        assert!(matches!(
            mono.require_stereo(),
            Err(AudioError::InvalidChannels { expected: 2, got: 1 })
        ));
    }
}
