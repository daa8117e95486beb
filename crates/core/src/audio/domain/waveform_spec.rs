use crate::shared::constants::{TARGET_BITS_PER_SAMPLE, TARGET_CHANNELS, TARGET_SAMPLE_RATE};
use crate::shared::error::TranscribeError;

/// Declared layout of a PCM waveform, as read from its container header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveformSpec {
    pub channels: u16,
    pub bits_per_sample: u16,
    pub sample_rate: u32,
}

impl WaveformSpec {
    /// The only layout the recognizers accept: mono, 16-bit, 16 kHz.
    pub const TARGET: WaveformSpec = WaveformSpec {
        channels: TARGET_CHANNELS,
        bits_per_sample: TARGET_BITS_PER_SAMPLE,
        sample_rate: TARGET_SAMPLE_RATE,
    };

    pub fn sample_width_bytes(&self) -> u16 {
        self.bits_per_sample.div_ceil(8)
    }

    pub fn validate(&self) -> Result<(), TranscribeError> {
        if self.channels != TARGET_CHANNELS
            || self.sample_width_bytes() != 2
            || self.sample_rate != TARGET_SAMPLE_RATE
        {
            return Err(TranscribeError::InvalidAudioFormat(*self));
        }
        Ok(())
    }

    pub fn duration_secs(&self, frames: u32) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        frames as f64 / self.sample_rate as f64
    }
}

impl std::fmt::Display for WaveformSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} channel(s), {}-bit, {} Hz",
            self.channels, self.bits_per_sample, self.sample_rate
        )
    }
}

impl From<hound::WavSpec> for WaveformSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            sample_rate: spec.sample_rate,
        }
    }
}
