//! Remote speech-to-text boundary.
//!
//! The orchestrator only sees [`TranscriptionClient`]; the real HTTP
//! implementation and the scripted test double both live behind it.

pub mod client;
pub mod recognize;

pub use client::{
    MockTranscriptionClient, TranscribeError, TranscriptionClient, TranscriptionRequest,
    TranscriptionResponse,
};
pub use recognize::{RecognizeClient, RecognizeConfig};
