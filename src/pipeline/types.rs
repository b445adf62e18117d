//! Data types for the transcription pipeline.

use crate::transcribe::TranscribeError;

/// Lifecycle of one segment inside a run.
///
/// Transitions are monotonic: `Pending → InProgress → {Succeeded, Failed}`.
/// A transient failure may step back to `Pending` for a later retry pass,
/// but terminal states are never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStatus {
    Pending,
    InProgress,
    Succeeded,
    Failed,
}

impl SegmentStatus {
    /// True once no further attempt will be made for this segment.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl std::fmt::Display for SegmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Per-segment progress record, owned by the run's status table.
///
/// Only the orchestrator mutates these, one writer per segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentResult {
    pub index: u32,
    pub status: SegmentStatus,
    /// Recognized text; present once the segment succeeded. May be empty
    /// when the segment held only silence.
    pub text: Option<String>,
    /// Last error observed for this segment.
    pub error: Option<TranscribeError>,
    /// Number of transcription attempts started so far.
    pub attempt_count: u32,
}

impl SegmentResult {
    /// Fresh record at orchestration start.
    pub fn new(index: u32) -> Self {
        Self {
            index,
            status: SegmentStatus::Pending,
            text: None,
            error: None,
            attempt_count: 0,
        }
    }

    /// Marks the start of an attempt.
    pub fn begin_attempt(&mut self) {
        debug_assert!(
            !self.status.is_terminal(),
            "attempt on terminal segment {}",
            self.index
        );
        self.status = SegmentStatus::InProgress;
        self.attempt_count += 1;
    }

    /// Records a successful attempt.
    pub fn succeed(&mut self, text: String) {
        debug_assert_eq!(self.status, SegmentStatus::InProgress);
        self.status = SegmentStatus::Succeeded;
        self.text = Some(text);
        self.error = None;
    }

    /// Records a terminal failure.
    pub fn fail(&mut self, error: TranscribeError) {
        debug_assert_eq!(self.status, SegmentStatus::InProgress);
        self.status = SegmentStatus::Failed;
        self.error = Some(error);
    }

    /// Steps back to `Pending` after a transient failure, keeping the
    /// error for diagnostics until the next attempt overwrites it.
    pub fn defer_retry(&mut self, error: TranscribeError) {
        debug_assert_eq!(self.status, SegmentStatus::InProgress);
        self.status = SegmentStatus::Pending;
        self.error = Some(error);
    }
}

/// One state transition, as reported to a progress sink.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub segment_index: u32,
    pub status: SegmentStatus,
    pub attempt_count: u32,
}

impl ProgressEvent {
    pub(crate) fn from_result(result: &SegmentResult) -> Self {
        Self {
            segment_index: result.index,
            status: result.status,
            attempt_count: result.attempt_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_terminality() {
        assert!(!SegmentStatus::Pending.is_terminal());
        assert!(!SegmentStatus::InProgress.is_terminal());
        assert!(SegmentStatus::Succeeded.is_terminal());
        assert!(SegmentStatus::Failed.is_terminal());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SegmentStatus::Pending.to_string(), "pending");
        assert_eq!(SegmentStatus::InProgress.to_string(), "in-progress");
        assert_eq!(SegmentStatus::Succeeded.to_string(), "succeeded");
        assert_eq!(SegmentStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn test_new_result_is_pending() {
        let result = SegmentResult::new(3);
        assert_eq!(result.index, 3);
        assert_eq!(result.status, SegmentStatus::Pending);
        assert_eq!(result.attempt_count, 0);
        assert!(result.text.is_none());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_success_lifecycle() {
        let mut result = SegmentResult::new(0);
        result.begin_attempt();
        assert_eq!(result.status, SegmentStatus::InProgress);
        assert_eq!(result.attempt_count, 1);

        result.succeed("namaste".to_string());
        assert_eq!(result.status, SegmentStatus::Succeeded);
        assert_eq!(result.text.as_deref(), Some("namaste"));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_retry_lifecycle_keeps_error_until_next_attempt() {
        let mut result = SegmentResult::new(0);
        result.begin_attempt();
        result.defer_retry(TranscribeError::transient("timeout"));

        assert_eq!(result.status, SegmentStatus::Pending);
        assert_eq!(result.attempt_count, 1);
        assert!(result.error.is_some());

        result.begin_attempt();
        assert_eq!(result.attempt_count, 2);
        result.succeed("dobara".to_string());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_failure_keeps_last_error() {
        let mut result = SegmentResult::new(1);
        result.begin_attempt();
        result.fail(TranscribeError::permanent("bad audio"));

        assert_eq!(result.status, SegmentStatus::Failed);
        assert_eq!(result.error, Some(TranscribeError::permanent("bad audio")));
    }

    #[test]
    fn test_progress_event_from_result() {
        let mut result = SegmentResult::new(7);
        result.begin_attempt();

        let event = ProgressEvent::from_result(&result);
        assert_eq!(event.segment_index, 7);
        assert_eq!(event.status, SegmentStatus::InProgress);
        assert_eq!(event.attempt_count, 1);
    }
}
