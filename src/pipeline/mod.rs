//! Transcription pipeline for one recording.
//!
//! ```text
//! ┌──────────┐    ┌─────────┐    ┌──────────────┐    ┌─────────────┐
//! │ Audio    │───▶│ Chunker │───▶│ Orchestrator │───▶│ PipelineRun │───▶ transcript
//! │ Codec    │    │         │    │ (bounded     │    │ (ordered    │     + manifest
//! └──────────┘    └─────────┘    │  dispatch)   │    │  join)      │
//!                                └──────┬───────┘    └─────────────┘
//!                                       │
//!                                       ▼
//!                                 ProgressSink
//! ```

pub mod orchestrator;
pub mod progress;
pub mod run;
pub mod types;

pub use orchestrator::{CancelHandle, Orchestrator, OrchestratorConfig};
pub use progress::{CollectorSink, LogSink, NullSink, ProgressSink};
pub use run::{PipelineRun, StatusCounts};
pub use types::{ProgressEvent, SegmentResult, SegmentStatus};
