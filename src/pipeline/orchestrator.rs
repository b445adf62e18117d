//! Orchestrates transcription over all segments of one recording.
//!
//! Each segment walks the state machine
//! `Pending → InProgress → {Succeeded, Failed}`, with transient failures
//! stepping back to `Pending` until the retry budget runs out. Dispatch is
//! semaphore-bounded; the joined transcript is ordered by segment index at
//! join time, never by completion order, so the output is deterministic
//! for identical remote responses.

use crate::audio::Segment;
use crate::config::Config;
use crate::defaults;
use crate::error::{FieldscribeError, Result};
use crate::pipeline::progress::{NullSink, ProgressSink};
use crate::pipeline::run::PipelineRun;
use crate::pipeline::types::{ProgressEvent, SegmentResult, SegmentStatus};
use crate::transcribe::{TranscribeError, TranscriptionClient, TranscriptionRequest};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// Configuration for one orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// BCP-47 language code sent with every request.
    pub language_code: String,
    /// Recognition model identifier.
    pub model: String,
    /// Automatic retries per segment after a transient failure.
    pub retry_limit: u32,
    /// Concurrent in-flight transcribe calls. Must be at least 1.
    pub max_concurrent: usize,
    /// Delay before the first retry pass; doubles each pass.
    pub backoff_base: Duration,
    /// Ceiling on the retry delay.
    pub backoff_cap: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            language_code: defaults::DEFAULT_LANGUAGE_CODE.to_string(),
            model: defaults::SPEECH_MODEL.to_string(),
            retry_limit: defaults::RETRY_LIMIT,
            max_concurrent: defaults::MAX_CONCURRENT,
            backoff_base: defaults::BACKOFF_BASE,
            backoff_cap: defaults::BACKOFF_CAP,
        }
    }
}

impl OrchestratorConfig {
    /// Builds orchestrator settings from the application config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            language_code: config.speech.language_code.clone(),
            model: config.speech.model.clone(),
            retry_limit: config.pipeline.retry_limit,
            max_concurrent: config.pipeline.max_concurrent,
            ..Default::default()
        }
    }
}

/// Handle for cancelling a run from another task.
///
/// Cancellation is cooperative: in-flight calls finish, but no further
/// segments are dispatched once the flag is observed.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Drives the chunk→transcribe flow and owns the retry policy.
pub struct Orchestrator {
    client: Arc<dyn TranscriptionClient>,
    config: OrchestratorConfig,
    progress: Arc<dyn ProgressSink>,
    cancel: Arc<AtomicBool>,
}

/// Lock helper that shrugs off poisoning: a panicked segment task must not
/// wedge the rest of the run.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Exponential backoff delay before retry pass `pass` (1-based).
fn backoff_delay(pass: u32, base: Duration, cap: Duration) -> Duration {
    if base.is_zero() {
        return Duration::ZERO;
    }
    base.saturating_mul(1u32 << (pass - 1).min(16)).min(cap)
}

impl Orchestrator {
    /// Creates an orchestrator with a silent progress sink.
    pub fn new(client: Arc<dyn TranscriptionClient>, config: OrchestratorConfig) -> Self {
        Self {
            client,
            config,
            progress: Arc::new(NullSink),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Sets the sink that receives every segment state transition.
    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// Returns a handle that can cancel this orchestrator's run.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: self.cancel.clone(),
        }
    }

    /// Transcribes all segments and returns the finished run.
    ///
    /// Returns `Err` only for configuration problems and authentication
    /// failures; per-segment trouble is recorded in the run instead. On
    /// auth failure the run is aborted with no partial transcript. On
    /// cancellation the run is returned with undispatched segments still
    /// `Pending`.
    pub async fn run(&self, segments: Vec<Segment>) -> Result<PipelineRun> {
        if self.config.max_concurrent == 0 {
            return Err(FieldscribeError::InvalidConfig {
                key: "max_concurrent".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let started = Instant::now();
        let segments = Arc::new(segments);
        let table: Arc<Vec<Mutex<SegmentResult>>> = Arc::new(
            segments
                .iter()
                .map(|s| Mutex::new(SegmentResult::new(s.index)))
                .collect(),
        );

        // Announce the initial Pending state of every segment.
        for slot in table.iter() {
            self.progress
                .report(&ProgressEvent::from_result(&lock(slot)));
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent));
        let auth_failure: Arc<Mutex<Option<TranscribeError>>> = Arc::new(Mutex::new(None));
        let aborted = Arc::new(AtomicBool::new(false));

        let mut to_dispatch: Vec<usize> = (0..segments.len()).collect();
        let mut pass: u32 = 0;

        loop {
            if pass > 0 {
                let delay = backoff_delay(pass, self.config.backoff_base, self.config.backoff_cap);
                if !delay.is_zero() {
                    tracing::debug!(pass, delay_ms = delay.as_millis() as u64, "retry backoff");
                    tokio::time::sleep(delay).await;
                }
            }

            let mut handles = Vec::with_capacity(to_dispatch.len());
            for i in to_dispatch.drain(..) {
                if self.cancel.load(Ordering::SeqCst) || aborted.load(Ordering::SeqCst) {
                    break;
                }

                let permit = semaphore.clone().acquire_owned().await.ok();

                // The wait for a permit can be long; re-check before dispatch.
                if self.cancel.load(Ordering::SeqCst) || aborted.load(Ordering::SeqCst) {
                    break;
                }

                let client = self.client.clone();
                let segments = segments.clone();
                let table = table.clone();
                let progress = self.progress.clone();
                let auth_failure = auth_failure.clone();
                let aborted = aborted.clone();
                let language_code = self.config.language_code.clone();
                let model = self.config.model.clone();
                let retry_limit = self.config.retry_limit;

                handles.push(tokio::spawn(async move {
                    let _permit = permit;

                    let segment = &segments[i];
                    let request = TranscriptionRequest {
                        segment_index: segment.index,
                        audio: segment.audio.clone(),
                        language_code,
                        model,
                    };

                    {
                        let mut slot = lock(&table[i]);
                        slot.begin_attempt();
                        progress.report(&ProgressEvent::from_result(&slot));
                    }

                    let outcome = client.transcribe(&request).await;

                    let mut slot = lock(&table[i]);
                    match outcome {
                        Ok(response) => slot.succeed(response.text),
                        Err(error @ TranscribeError::Transient { .. }) => {
                            if slot.attempt_count <= retry_limit {
                                slot.defer_retry(error);
                            } else {
                                slot.fail(error);
                            }
                        }
                        Err(error @ TranscribeError::Permanent { .. }) => slot.fail(error),
                        Err(error @ TranscribeError::Auth { .. }) => {
                            // Credentials are a run-wide precondition; stop
                            // dispatching everything else.
                            aborted.store(true, Ordering::SeqCst);
                            lock(&auth_failure).get_or_insert(error.clone());
                            slot.fail(error);
                        }
                    }
                    progress.report(&ProgressEvent::from_result(&slot));
                }));
            }

            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::error!(error = %e, "segment task panicked");
                }
            }

            if let Some(error) = lock(&auth_failure).take() {
                return Err(error.into());
            }
            if self.cancel.load(Ordering::SeqCst) {
                break;
            }

            // Anything stepped back to Pending is a retry candidate;
            // segments that were never dispatched only remain Pending on
            // cancel or abort, which exit above.
            to_dispatch = table
                .iter()
                .enumerate()
                .filter(|(_, slot)| lock(slot).status == SegmentStatus::Pending)
                .map(|(i, _)| i)
                .collect();

            if to_dispatch.is_empty() {
                break;
            }
            pass += 1;
        }

        let results: Vec<SegmentResult> = table.iter().map(|slot| lock(slot).clone()).collect();
        let cancelled = self.cancel.load(Ordering::SeqCst);

        let run = PipelineRun::new(results, cancelled, started.elapsed());
        tracing::info!(
            segments = run.len(),
            succeeded = run.counts().succeeded,
            failed = run.counts().failed,
            cancelled,
            elapsed_ms = run.elapsed().as_millis() as u64,
            "run finished"
        );
        Ok(run)
    }
}
