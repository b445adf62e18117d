//! Transcription client trait and request/response types.

use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Mutex;
use thiserror::Error;

/// One attempt's worth of input for the remote recognizer.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    /// Index of the segment this audio belongs to, for logging and
    /// scripted test doubles.
    pub segment_index: u32,
    /// WAV-encoded segment audio.
    pub audio: Vec<u8>,
    /// BCP-47 language code, e.g. "hi-IN".
    pub language_code: String,
    /// Recognition model identifier, e.g. "telephony".
    pub model: String,
}

/// Recognized text for one segment attempt.
///
/// `text` may be empty when the segment held only silence; that still
/// counts as a successful attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranscriptionResponse {
    pub text: String,
}

impl TranscriptionResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// What went wrong with one remote call, classified by what the caller may
/// do about it. No retry logic lives at this boundary; the orchestrator
/// dispatches on the variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscribeError {
    /// Network trouble, timeout, or rate limiting. Safe to retry.
    #[error("Transient transcription failure: {message}")]
    Transient { message: String },

    /// The request itself is bad (malformed audio, unsupported
    /// language/model combination). Retrying is pointless.
    #[error("Permanent transcription failure: {message}")]
    Permanent { message: String },

    /// Credential failure. Fatal for the whole run, not just one segment.
    #[error("Authentication failed: {message}")]
    Auth { message: String },
}

impl TranscribeError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
        }
    }

    pub fn permanent(message: impl Into<String>) -> Self {
        Self::Permanent {
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// True when the orchestrator may schedule another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

/// Abstraction over the remote speech-to-text call.
///
/// Implementations submit one segment and report what happened; they never
/// retry on their own.
#[async_trait]
pub trait TranscriptionClient: Send + Sync {
    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<TranscriptionResponse, TranscribeError>;
}

type ScriptedOutcome = Result<TranscriptionResponse, TranscribeError>;

/// Lock helper that shrugs off poisoning; mock state stays usable even if
/// a test thread panicked mid-call.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Scripted transcription client for tests.
///
/// Outcomes are queued per segment index; each call pops the next one.
/// When a segment's queue runs dry (or was never scripted) the default
/// response is returned.
pub struct MockTranscriptionClient {
    script: Mutex<HashMap<u32, VecDeque<ScriptedOutcome>>>,
    default_text: String,
    calls: Mutex<Vec<u32>>,
}

impl MockTranscriptionClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(HashMap::new()),
            default_text: "mock transcription".to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Sets the text returned for unscripted calls.
    pub fn with_default_text(mut self, text: &str) -> Self {
        self.default_text = text.to_string();
        self
    }

    /// Queues outcomes for one segment index, consumed in order.
    pub fn with_script(self, index: u32, outcomes: Vec<ScriptedOutcome>) -> Self {
        lock(&self.script).insert(index, outcomes.into());
        self
    }

    /// Segment indices in the order calls arrived.
    pub fn calls(&self) -> Vec<u32> {
        lock(&self.calls).clone()
    }

    /// Total number of transcribe calls across all segments.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

impl Default for MockTranscriptionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptionClient for MockTranscriptionClient {
    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<TranscriptionResponse, TranscribeError> {
        lock(&self.calls).push(request.segment_index);

        let scripted = lock(&self.script)
            .get_mut(&request.segment_index)
            .and_then(VecDeque::pop_front);

        match scripted {
            Some(outcome) => outcome,
            None => Ok(TranscriptionResponse::new(self.default_text.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request(index: u32) -> TranscriptionRequest {
        TranscriptionRequest {
            segment_index: index,
            audio: vec![0u8; 64],
            language_code: "hi-IN".to_string(),
            model: "telephony".to_string(),
        }
    }

    #[test]
    fn test_error_classification() {
        assert!(TranscribeError::transient("timeout").is_retryable());
        assert!(!TranscribeError::permanent("bad audio").is_retryable());
        assert!(!TranscribeError::auth("bad key").is_retryable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            TranscribeError::transient("connection reset").to_string(),
            "Transient transcription failure: connection reset"
        );
        assert_eq!(
            TranscribeError::auth("API key rejected").to_string(),
            "Authentication failed: API key rejected"
        );
    }

    #[tokio::test]
    async fn test_mock_default_response() {
        let client = MockTranscriptionClient::new().with_default_text("hello");

        let response = client.transcribe(&make_request(0)).await.unwrap();
        assert_eq!(response.text, "hello");
    }

    #[tokio::test]
    async fn test_mock_scripted_outcomes_in_order() {
        let client = MockTranscriptionClient::new().with_script(
            1,
            vec![
                Err(TranscribeError::transient("first attempt times out")),
                Ok(TranscriptionResponse::new("second attempt works")),
            ],
        );

        let first = client.transcribe(&make_request(1)).await;
        assert_eq!(first, Err(TranscribeError::transient("first attempt times out")));

        let second = client.transcribe(&make_request(1)).await.unwrap();
        assert_eq!(second.text, "second attempt works");
    }

    #[tokio::test]
    async fn test_mock_exhausted_script_falls_back_to_default() {
        let client = MockTranscriptionClient::new()
            .with_default_text("fallback")
            .with_script(0, vec![Ok(TranscriptionResponse::new("scripted"))]);

        assert_eq!(
            client.transcribe(&make_request(0)).await.unwrap().text,
            "scripted"
        );
        assert_eq!(
            client.transcribe(&make_request(0)).await.unwrap().text,
            "fallback"
        );
    }

    #[tokio::test]
    async fn test_mock_records_calls() {
        let client = MockTranscriptionClient::new();
        client.transcribe(&make_request(2)).await.unwrap();
        client.transcribe(&make_request(0)).await.unwrap();

        assert_eq!(client.calls(), vec![2, 0]);
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_client_trait_is_object_safe() {
        let client: Box<dyn TranscriptionClient> =
            Box::new(MockTranscriptionClient::new().with_default_text("boxed"));

        let response = client.transcribe(&make_request(0)).await.unwrap();
        assert_eq!(response.text, "boxed");
    }
}
