//! fieldscribe - Farmer-interview transcription pipeline
//!
//! Chunks long field recordings into API-compliant segments, dispatches
//! them to a remote speech service, and reassembles one ordered transcript
//! with explicit gaps where segments failed.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

#[cfg(feature = "cli")]
pub mod app;
pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod pipeline;
pub mod transcribe;

// Core types (decode → split → orchestrate → join)
pub use audio::{AudioBuffer, AudioFormat, Segment};
pub use pipeline::{
    CancelHandle, Orchestrator, OrchestratorConfig, PipelineRun, ProgressEvent, ProgressSink,
    SegmentResult, SegmentStatus,
};
pub use transcribe::{
    RecognizeClient, RecognizeConfig, TranscribeError, TranscriptionClient, TranscriptionRequest,
    TranscriptionResponse,
};

// Error handling
pub use error::{FieldscribeError, Result};

// Config
pub use config::Config;
