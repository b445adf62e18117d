//! Completed-run state: the per-segment result table and the joined
//! transcript derived from it.

use crate::defaults::gap_marker;
use crate::pipeline::types::{SegmentResult, SegmentStatus};
use std::time::Duration;

/// Counts of segments by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.pending + self.in_progress + self.succeeded + self.failed
    }
}

/// The full ordered result set for one audio input.
///
/// Owned by the caller once `Orchestrator::run` returns; exposes aggregate
/// state, the failure manifest, and the joined transcript once every
/// segment is terminal. Discarded after the transcript is consumed — no
/// run state outlives the run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    results: Vec<SegmentResult>,
    cancelled: bool,
    elapsed: Duration,
}

impl PipelineRun {
    pub(crate) fn new(results: Vec<SegmentResult>, cancelled: bool, elapsed: Duration) -> Self {
        Self {
            results,
            cancelled,
            elapsed,
        }
    }

    /// Per-segment results in index order.
    pub fn results(&self) -> &[SegmentResult] {
        &self.results
    }

    /// Number of segments in the run.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True for a run over zero segments.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// True when the caller cancelled before every segment finished.
    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    /// Wall-clock time the run took.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Aggregate counts by status.
    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for result in &self.results {
            match result.status {
                SegmentStatus::Pending => counts.pending += 1,
                SegmentStatus::InProgress => counts.in_progress += 1,
                SegmentStatus::Succeeded => counts.succeeded += 1,
                SegmentStatus::Failed => counts.failed += 1,
            }
        }
        counts
    }

    /// True once every segment reached a terminal status.
    pub fn is_complete(&self) -> bool {
        self.results.iter().all(|r| r.status.is_terminal())
    }

    /// Segments that ended in failure, with their last error — the
    /// manifest shown to the user alongside a gapped transcript.
    pub fn failures(&self) -> Vec<&SegmentResult> {
        self.results
            .iter()
            .filter(|r| r.status == SegmentStatus::Failed)
            .collect()
    }

    /// The joined transcript, available once the run is complete.
    ///
    /// Succeeded texts are concatenated in `index` order separated by a
    /// single space; a failed segment contributes an explicit gap marker
    /// instead of being silently dropped. A segment that transcribed to
    /// empty text (silence) counts as succeeded and contributes nothing,
    /// not even a separator.
    pub fn transcript(&self) -> Option<String> {
        if !self.is_complete() {
            return None;
        }

        let parts: Vec<String> = self
            .results
            .iter()
            .filter_map(|r| match r.status {
                SegmentStatus::Succeeded => match r.text.as_deref() {
                    Some(text) if !text.is_empty() => Some(text.to_string()),
                    _ => None,
                },
                SegmentStatus::Failed => Some(gap_marker(r.index)),
                _ => None,
            })
            .collect();

        Some(parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcribe::TranscribeError;

    fn succeeded(index: u32, text: &str) -> SegmentResult {
        let mut result = SegmentResult::new(index);
        result.begin_attempt();
        result.succeed(text.to_string());
        result
    }

    fn failed(index: u32) -> SegmentResult {
        let mut result = SegmentResult::new(index);
        result.begin_attempt();
        result.fail(TranscribeError::permanent("bad audio"));
        result
    }

    #[test]
    fn test_transcript_joins_in_index_order() {
        let run = PipelineRun::new(
            vec![succeeded(0, "ek"), succeeded(1, "do"), succeeded(2, "teen")],
            false,
            Duration::from_secs(1),
        );

        assert_eq!(run.transcript().unwrap(), "ek do teen");
    }

    #[test]
    fn test_transcript_inserts_gap_marker() {
        let run = PipelineRun::new(
            vec![succeeded(0, "a"), succeeded(1, "b"), failed(2)],
            false,
            Duration::from_secs(1),
        );

        assert_eq!(
            run.transcript().unwrap(),
            "a b [segment 3 failed to transcribe]"
        );
    }

    #[test]
    fn test_transcript_skips_empty_text_without_separator() {
        let run = PipelineRun::new(
            vec![succeeded(0, "pehla"), succeeded(1, ""), succeeded(2, "teesra")],
            false,
            Duration::from_secs(1),
        );

        assert_eq!(run.transcript().unwrap(), "pehla teesra");
    }

    #[test]
    fn test_transcript_none_while_incomplete() {
        let run = PipelineRun::new(
            vec![succeeded(0, "a"), SegmentResult::new(1)],
            false,
            Duration::from_secs(1),
        );

        assert!(run.transcript().is_none());
        assert!(!run.is_complete());
    }

    #[test]
    fn test_empty_run_has_empty_transcript() {
        let run = PipelineRun::new(vec![], false, Duration::ZERO);
        assert!(run.is_empty());
        assert!(run.is_complete());
        assert_eq!(run.transcript().unwrap(), "");
    }

    #[test]
    fn test_counts() {
        let mut in_progress = SegmentResult::new(2);
        in_progress.begin_attempt();

        let run = PipelineRun::new(
            vec![
                succeeded(0, "a"),
                failed(1),
                in_progress,
                SegmentResult::new(3),
            ],
            false,
            Duration::from_secs(1),
        );

        let counts = run.counts();
        assert_eq!(counts.succeeded, 1);
        assert_eq!(counts.failed, 1);
        assert_eq!(counts.in_progress, 1);
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_failures_manifest() {
        let run = PipelineRun::new(
            vec![succeeded(0, "a"), failed(1), failed(2)],
            false,
            Duration::from_secs(1),
        );

        let failures = run.failures();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].index, 1);
        assert_eq!(failures[1].index, 2);
        assert!(failures.iter().all(|f| f.error.is_some()));
    }

    #[test]
    fn test_cancelled_flag() {
        let run = PipelineRun::new(
            vec![succeeded(0, "a"), SegmentResult::new(1)],
            true,
            Duration::from_secs(1),
        );

        assert!(run.cancelled());
        assert!(run.transcript().is_none());
        assert_eq!(run.counts().pending, 1);
    }
}
