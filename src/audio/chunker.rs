//! Partitions a decoded recording into API-compliant segments.
//!
//! Walks the buffer from offset 0, repeatedly cutting `min(max, remaining)`.
//! Cuts land on sample boundaries only, so re-encoded segments are never
//! corrupted mid-sample. Boundaries may fall mid-word; there is no
//! silence-aware splitting, and nothing downstream corrects for it.

use crate::audio::buffer::{AudioBuffer, duration_to_samples, samples_to_duration};
use crate::audio::codec::encode_range;
use crate::error::{FieldscribeError, Result};
use std::time::Duration;

/// A bounded-duration slice of the source audio, the unit of work sent to
/// the remote speech API.
///
/// Segments are contiguous, non-overlapping, cover the full source
/// duration, and are ordered by `index`. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// 0-based ordinal; defines the final transcript ordering.
    pub index: u32,
    /// First sample of the slice (inclusive).
    pub start: u64,
    /// One past the last sample of the slice.
    pub end: u64,
    /// Sample rate of the source, for offset/duration conversion.
    pub sample_rate: u32,
    /// WAV-encoded bytes ready for API submission.
    pub audio: Vec<u8>,
}

impl Segment {
    /// Number of samples in this segment.
    pub fn len_samples(&self) -> u64 {
        self.end - self.start
    }

    /// Duration of this segment.
    pub fn duration(&self) -> Duration {
        samples_to_duration(self.len_samples(), self.sample_rate)
    }

    /// Offset of the segment start within the recording.
    pub fn start_offset(&self) -> Duration {
        samples_to_duration(self.start, self.sample_rate)
    }

    /// Offset of the segment end within the recording.
    pub fn end_offset(&self) -> Duration {
        samples_to_duration(self.end, self.sample_rate)
    }

    /// Human-readable position label, e.g. `"59.0s - 118.0s"`.
    pub fn time_label(&self) -> String {
        format!(
            "{:.1}s - {:.1}s",
            self.start_offset().as_secs_f64(),
            self.end_offset().as_secs_f64()
        )
    }
}

/// Splits a buffer into ordered segments of at most `max_duration` each.
///
/// Guarantees: segment sample counts sum exactly to the buffer length (no
/// gaps, no overlap, no truncation) and `segments.len()` equals
/// `ceil(buffer_samples / max_samples)`. An empty buffer yields no
/// segments.
///
/// Fails with `InvalidConfig` when `max_duration` is zero or rounds down
/// to zero samples at the buffer's rate.
pub fn split(buffer: &AudioBuffer, max_duration: Duration) -> Result<Vec<Segment>> {
    let max_samples = duration_to_samples(max_duration, buffer.sample_rate());
    if max_duration.is_zero() || max_samples == 0 {
        return Err(FieldscribeError::InvalidConfig {
            key: "max_chunk".to_string(),
            message: "segment duration must be greater than zero".to_string(),
        });
    }

    let total = buffer.len_samples();
    let mut segments = Vec::with_capacity(total.div_ceil(max_samples) as usize);

    let mut start = 0u64;
    let mut index = 0u32;
    while start < total {
        let end = (start + max_samples).min(total);
        let audio = encode_range(buffer, start, end)?;
        segments.push(Segment {
            index,
            start,
            end,
            sample_rate: buffer.sample_rate(),
            audio,
        });
        start = end;
        index += 1;
    }

    Ok(segments)
}
