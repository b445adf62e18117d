//! Audio decoding, normalization, and chunking.
//!
//! ```text
//! ┌───────────┐    ┌─────────────┐    ┌─────────┐
//! │ raw bytes │───▶│ AudioCodec  │───▶│ Chunker │───▶ ordered Segments
//! │ (any fmt) │    │ (mono PCM)  │    │         │
//! └───────────┘    └─────────────┘    └─────────┘
//! ```

pub mod buffer;
pub mod chunker;
pub mod codec;

pub use buffer::AudioBuffer;
pub use chunker::{Segment, split};
pub use codec::{AudioFormat, decode, encode_range, encode_wav};
