//! Decoding and re-encoding of interview recordings.
//!
//! Decoding accepts the four formats field teams actually upload (WAV, MP3,
//! M4A, FLAC) and normalizes everything to [`AudioBuffer`] form: 16-bit
//! mono PCM at the source sample rate. Re-encoding produces WAV (LINEAR16)
//! bytes, the submission format for the synchronous recognize call.
//!
//! Both directions are pure transforms. Encoding the same range twice
//! yields byte-identical output, which keeps retried uploads idempotent.

use crate::audio::buffer::AudioBuffer;
use crate::error::{FieldscribeError, Result};
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Audio container formats accepted from the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    M4a,
    Flac,
}

impl AudioFormat {
    /// Parses a user-supplied format tag (file extension, case-insensitive).
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "wav" => Ok(Self::Wav),
            "mp3" => Ok(Self::Mp3),
            "m4a" => Ok(Self::M4a),
            "flac" => Ok(Self::Flac),
            other => Err(FieldscribeError::UnsupportedFormat {
                format: other.to_string(),
                message: "format tag not recognized".to_string(),
            }),
        }
    }

    /// Canonical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
            Self::Flac => "flac",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Decodes an audio blob into the canonical buffer form.
///
/// Fails with `UnsupportedFormat` when the payload does not parse as the
/// declared format. WAV goes through `hound`; the compressed formats go
/// through `symphonia`.
pub fn decode(bytes: &[u8], format: AudioFormat) -> Result<AudioBuffer> {
    match format {
        AudioFormat::Wav => decode_wav(bytes),
        AudioFormat::Mp3 | AudioFormat::M4a | AudioFormat::Flac => {
            decode_compressed(bytes, format)
        }
    }
}

fn unsupported(format: AudioFormat, message: impl std::fmt::Display) -> FieldscribeError {
    FieldscribeError::UnsupportedFormat {
        format: format.extension().to_string(),
        message: message.to_string(),
    }
}

fn decode_wav(bytes: &[u8]) -> Result<AudioBuffer> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| unsupported(AudioFormat::Wav, format!("failed to parse WAV: {e}")))?;

    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(unsupported(AudioFormat::Wav, "zero channels"));
    }

    // Widen/narrow every supported sample layout to i16.
    let interleaved: Vec<i16> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| unsupported(AudioFormat::Wav, format!("failed to read samples: {e}")))?,
        (hound::SampleFormat::Int, bits @ (8 | 24 | 32)) => reader
            .samples::<i32>()
            .map(|s| {
                s.map(|v| match bits {
                    // hound yields 8-bit audio already centered; widen.
                    8 => (v << 8) as i16,
                    24 => (v >> 8) as i16,
                    _ => (v >> 16) as i16,
                })
            })
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| unsupported(AudioFormat::Wav, format!("failed to read samples: {e}")))?,
        (hound::SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| unsupported(AudioFormat::Wav, format!("failed to read samples: {e}")))?,
        (_, bits) => {
            return Err(unsupported(
                AudioFormat::Wav,
                format!("unsupported sample layout: {bits} bits"),
            ));
        }
    };

    let samples = downmix(&interleaved, spec.channels as usize);
    Ok(AudioBuffer::new(samples, spec.sample_rate))
}

fn decode_compressed(bytes: &[u8], format: AudioFormat) -> Result<AudioBuffer> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(format.extension());

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| unsupported(format, format!("probe: {e}")))?;

    let mut reader = probed.format;

    let track = reader
        .default_track()
        .ok_or_else(|| unsupported(format, "no audio track found"))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| unsupported(format, "unknown sample rate"))?;
    let channels = codec_params.channels.map(|c| c.count()).unwrap_or(1);

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| unsupported(format, format!("codec: {e}")))?;

    let mut interleaved: Vec<i16> = Vec::new();

    loop {
        let packet = match reader.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(unsupported(format, format!("packet: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(e)) => {
                tracing::warn!(error = %e, "skipping corrupt audio frame");
                continue;
            }
            Err(e) => return Err(unsupported(format, format!("decode: {e}"))),
        };

        let spec = *decoded.spec();
        let frames = decoded.frames();
        if frames == 0 {
            continue;
        }

        let mut sample_buf = SampleBuffer::<i16>::new(frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        interleaved.extend_from_slice(sample_buf.samples());
    }

    if interleaved.is_empty() {
        return Err(unsupported(format, "no audio samples decoded"));
    }

    let samples = downmix(&interleaved, channels);
    Ok(AudioBuffer::new(samples, sample_rate))
}

/// Averages interleaved channels down to mono.
fn downmix(interleaved: &[i16], channels: usize) -> Vec<i16> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Re-encodes the sample range `[start, end)` as a WAV (LINEAR16) blob.
///
/// Offsets are sample indices, so cuts always land on sample boundaries.
/// Fails with `InvalidRange` if `start >= end` or `end` is past the buffer.
/// Deterministic: identical arguments yield byte-identical output.
pub fn encode_range(buffer: &AudioBuffer, start: u64, end: u64) -> Result<Vec<u8>> {
    if start >= end {
        return Err(FieldscribeError::InvalidRange {
            message: format!("start {start} >= end {end}"),
        });
    }
    if end > buffer.len_samples() {
        return Err(FieldscribeError::InvalidRange {
            message: format!(
                "end {} past buffer of {} samples",
                end,
                buffer.len_samples()
            ),
        });
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).map_err(|e| {
            FieldscribeError::AudioEncode {
                message: e.to_string(),
            }
        })?;
        for &sample in &buffer.samples()[start as usize..end as usize] {
            writer
                .write_sample(sample)
                .map_err(|e| FieldscribeError::AudioEncode {
                    message: e.to_string(),
                })?;
        }
        writer
            .finalize()
            .map_err(|e| FieldscribeError::AudioEncode {
                message: e.to_string(),
            })?;
    }
    Ok(cursor.into_inner())
}

/// Re-encodes the whole buffer as WAV, for export alongside the transcript.
pub fn encode_wav(buffer: &AudioBuffer) -> Result<Vec<u8>> {
    encode_range(buffer, 0, buffer.len_samples())
}
