//! Default configuration constants for fieldscribe.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

use std::time::Duration;

/// Maximum duration of one segment sent to the synchronous recognize call.
///
/// The remote API rejects synchronous requests longer than one minute; 59
/// seconds leaves headroom for container overhead. This is a hard API
/// ceiling, not a tuning knob.
pub const MAX_SYNC_DURATION_SECS: u64 = 59;

/// Default language code for transcription.
///
/// Farmer interviews are conducted in Hindi by default. Set a BCP-47 code
/// (e.g., "hi-IN", "mr-IN", "en-IN") to match the interview language.
pub const DEFAULT_LANGUAGE_CODE: &str = "hi-IN";

/// Default recognition model.
///
/// "telephony" is tuned for narrow-band recorded speech, which matches the
/// phone-call quality of most field recordings.
pub const SPEECH_MODEL: &str = "telephony";

/// Default synchronous recognize endpoint.
pub const RECOGNIZE_ENDPOINT: &str = "https://speech.googleapis.com/v1/speech:recognize";

/// Environment variable holding the speech API key.
pub const API_KEY_ENV: &str = "SPEECH_API_KEY";

/// Default number of automatic retries for a transient segment failure.
pub const RETRY_LIMIT: u32 = 2;

/// Default number of concurrent in-flight recognize calls.
///
/// Kept low to respect remote rate limits; raise for accounts with higher
/// quota.
pub const MAX_CONCURRENT: usize = 2;

/// Base delay before the first retry pass.
///
/// Doubles on each subsequent pass up to [`BACKOFF_CAP`].
pub const BACKOFF_BASE: Duration = Duration::from_millis(500);

/// Upper bound on the retry backoff delay.
pub const BACKOFF_CAP: Duration = Duration::from_secs(8);

/// Timeout for one recognize HTTP round-trip.
///
/// Synchronous recognition of a 59s segment typically completes well under
/// a minute; anything slower is treated as a transient failure.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Render the placeholder inserted into the joined transcript where a
/// segment permanently failed.
///
/// Uses 1-based numbering since the marker is user-facing.
pub fn gap_marker(index: u32) -> String {
    format!("[segment {} failed to transcribe]", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_marker_is_one_based() {
        assert_eq!(gap_marker(0), "[segment 1 failed to transcribe]");
        assert_eq!(gap_marker(41), "[segment 42 failed to transcribe]");
    }

    #[test]
    fn backoff_base_below_cap() {
        assert!(BACKOFF_BASE < BACKOFF_CAP);
    }
}
