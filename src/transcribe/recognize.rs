//! HTTP client for a synchronous `speech:recognize` endpoint.
//!
//! Speaks the Google Cloud Speech-to-Text v1 synchronous REST shape: one
//! JSON request with base64 audio content, one JSON response with ranked
//! alternatives per result. Only classification happens here — every
//! failure is mapped onto the [`TranscribeError`] taxonomy and the
//! orchestrator decides what to do about it.

use crate::defaults;
use crate::transcribe::client::{
    TranscribeError, TranscriptionClient, TranscriptionRequest, TranscriptionResponse,
};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the recognize endpoint.
#[derive(Debug, Clone)]
pub struct RecognizeConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl RecognizeConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            timeout: defaults::REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognizeRequestBody {
    config: RecognitionConfig,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig {
    language_code: String,
    model: String,
    enable_automatic_punctuation: bool,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Deserialize, Default)]
struct RecognizeResponseBody {
    #[serde(default)]
    results: Vec<RecognizeResult>,
}

#[derive(Debug, Deserialize)]
struct RecognizeResult {
    #[serde(default)]
    alternatives: Vec<RecognizeAlternative>,
}

#[derive(Debug, Deserialize)]
struct RecognizeAlternative {
    #[serde(default)]
    transcript: String,
}

/// Client for the synchronous recognize call.
pub struct RecognizeClient {
    http: reqwest::Client,
    config: RecognizeConfig,
}

impl RecognizeClient {
    /// Builds a client, failing up front when no credential is configured.
    ///
    /// Credentials are a run-wide precondition; checking here means the
    /// pipeline aborts before any audio is decoded or quota spent.
    pub fn new(config: RecognizeConfig) -> Result<Self, TranscribeError> {
        if config.api_key.trim().is_empty() {
            return Err(TranscribeError::auth(format!(
                "no API key configured; set {}",
                defaults::API_KEY_ENV
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TranscribeError::permanent(format!("HTTP client build failed: {e}")))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl TranscriptionClient for RecognizeClient {
    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<TranscriptionResponse, TranscribeError> {
        let body = RecognizeRequestBody {
            config: RecognitionConfig {
                language_code: request.language_code.clone(),
                model: request.model.clone(),
                enable_automatic_punctuation: true,
            },
            audio: RecognitionAudio {
                content: general_purpose::STANDARD.encode(&request.audio),
            },
        };

        tracing::debug!(
            segment = request.segment_index,
            bytes = request.audio.len(),
            language = %request.language_code,
            "submitting segment for recognition"
        );

        let response = self
            .http
            .post(&self.config.endpoint)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &detail));
        }

        let parsed: RecognizeResponseBody = response
            .json()
            .await
            .map_err(|e| TranscribeError::transient(format!("failed to parse response: {e}")))?;

        Ok(TranscriptionResponse::new(join_alternatives(&parsed)))
    }
}

/// Joins the top alternative of each result with single spaces.
///
/// An empty `results` list (pure silence) yields an empty string, which the
/// orchestrator records as a success.
fn join_alternatives(body: &RecognizeResponseBody) -> String {
    body.results
        .iter()
        .filter_map(|r| r.alternatives.first())
        .map(|a| a.transcript.as_str())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Maps a failed transport attempt onto the error taxonomy.
fn classify_request_error(error: reqwest::Error) -> TranscribeError {
    if error.is_timeout() || error.is_connect() || error.is_request() {
        TranscribeError::transient(format!("request failed: {error}"))
    } else {
        TranscribeError::permanent(format!("request failed: {error}"))
    }
}

/// Maps a non-success HTTP status onto the error taxonomy.
fn classify_status(status: StatusCode, detail: &str) -> TranscribeError {
    let message = if detail.is_empty() {
        format!("API returned {status}")
    } else {
        format!("API returned {status}: {detail}")
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TranscribeError::auth(message),
        StatusCode::TOO_MANY_REQUESTS | StatusCode::REQUEST_TIMEOUT => {
            TranscribeError::transient(message)
        }
        s if s.is_server_error() => TranscribeError::transient(message),
        _ => TranscribeError::permanent(message),
    }
}
