//! Progress reporting for pipeline observers.
//!
//! The orchestrator reports every segment state transition to a sink.
//! Reporting is fire-and-forget: a sink that fails must swallow its own
//! trouble, it can never fail the pipeline.

use crate::pipeline::types::ProgressEvent;
use std::sync::Mutex;

/// Passive observer of segment state transitions.
///
/// Consumed by UIs and logs; the pipeline never reads anything back.
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: &ProgressEvent);
}

/// Sink that logs transitions through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn report(&self, event: &ProgressEvent) {
        tracing::info!(
            segment = event.segment_index,
            status = %event.status,
            attempt = event.attempt_count,
            "segment transition"
        );
    }
}

/// Sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn report(&self, _event: &ProgressEvent) {}
}

/// Sink that records every event, for tests and summaries.
#[derive(Debug, Default)]
pub struct CollectorSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events reported so far, in arrival order.
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl ProgressSink for CollectorSink {
    fn report(&self, event: &ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event.clone());
    }
}
