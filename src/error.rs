//! Error types for fieldscribe.

use crate::transcribe::TranscribeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FieldscribeError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio decoding errors
    #[error("Unsupported or unreadable {format} audio: {message}")]
    UnsupportedFormat { format: String, message: String },

    #[error("Invalid audio range: {message}")]
    InvalidRange { message: String },

    #[error("Audio encoding failed: {message}")]
    AudioEncode { message: String },

    // Remote transcription errors that abort a run
    #[error(transparent)]
    Transcribe(#[from] TranscribeError),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, FieldscribeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_file_not_found_display() {
        let error = FieldscribeError::ConfigFileNotFound {
            path: "/path/to/config.toml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found at /path/to/config.toml"
        );
    }

    #[test]
    fn test_invalid_config_display() {
        let error = FieldscribeError::InvalidConfig {
            key: "max_chunk_secs".to_string(),
            message: "must be positive".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for max_chunk_secs: must be positive"
        );
    }

    #[test]
    fn test_unsupported_format_display() {
        let error = FieldscribeError::UnsupportedFormat {
            format: "ogg".to_string(),
            message: "format tag not recognized".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unsupported or unreadable ogg audio: format tag not recognized"
        );
    }

    #[test]
    fn test_invalid_range_display() {
        let error = FieldscribeError::InvalidRange {
            message: "start 100 >= end 100".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid audio range: start 100 >= end 100"
        );
    }

    #[test]
    fn test_transcribe_error_is_transparent() {
        let error: FieldscribeError = TranscribeError::Auth {
            message: "missing API key".to_string(),
        }
        .into();
        assert_eq!(error.to_string(), "Authentication failed: missing API key");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: FieldscribeError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: FieldscribeError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<FieldscribeError>();
        assert_sync::<FieldscribeError>();
    }
}
