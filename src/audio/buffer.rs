//! Canonical decoded audio buffer.

use std::time::Duration;

/// Canonical decoded audio: 16-bit mono PCM at the source sample rate.
///
/// Immutable once produced by the codec; the chunker and encoder only read
/// from it. Multi-channel input is downmixed and sub-16-bit formats are
/// widened during decoding, so every downstream stage sees one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Wraps decoded mono samples at the given rate.
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        debug_assert!(sample_rate > 0, "sample rate must be positive");
        Self {
            samples,
            sample_rate,
        }
    }

    /// The raw sample data.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count; always 1 after normalization.
    pub fn channels(&self) -> u16 {
        1
    }

    /// Bits per sample; always 16 after normalization.
    pub fn bits_per_sample(&self) -> u16 {
        16
    }

    /// Total number of samples.
    pub fn len_samples(&self) -> u64 {
        self.samples.len() as u64
    }

    /// True if the buffer holds no audio.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Total duration, derived from the sample count.
    pub fn duration(&self) -> Duration {
        samples_to_duration(self.len_samples(), self.sample_rate)
    }
}

/// Converts a sample count at `rate` Hz to a duration using integer math.
pub(crate) fn samples_to_duration(samples: u64, rate: u32) -> Duration {
    Duration::from_nanos(samples.saturating_mul(1_000_000_000) / u64::from(rate))
}

/// Converts a duration to a sample count at `rate` Hz, truncating toward
/// zero so a cut never lands past the requested boundary.
pub(crate) fn duration_to_samples(duration: Duration, rate: u32) -> u64 {
    (duration.as_nanos() * u128::from(rate) / 1_000_000_000) as u64
}
