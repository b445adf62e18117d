use crate::defaults;
use crate::error::{FieldscribeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
#[cfg(feature = "cli")]
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub speech: SpeechConfig,
    pub pipeline: PipelineConfig,
}

/// Audio chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    /// Maximum segment duration in seconds. Must stay at or below the
    /// remote API's synchronous ceiling.
    pub max_chunk_secs: u64,
}

/// Remote speech recognition configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeechConfig {
    pub endpoint: String,
    pub language_code: String,
    pub model: String,
    /// API key; usually left unset here and supplied via SPEECH_API_KEY.
    pub api_key: Option<String>,
}

/// Orchestration configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub retry_limit: u32,
    pub max_concurrent: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            max_chunk_secs: defaults::MAX_SYNC_DURATION_SECS,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::RECOGNIZE_ENDPOINT.to_string(),
            language_code: defaults::DEFAULT_LANGUAGE_CODE.to_string(),
            model: defaults::SPEECH_MODEL.to_string(),
            api_key: None,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retry_limit: defaults::RETRY_LIMIT,
            max_concurrent: defaults::MAX_CONCURRENT,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FieldscribeError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                FieldscribeError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file doesn't exist
    ///
    /// Invalid TOML is still an error; only a missing file falls back.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(FieldscribeError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - FIELDSCRIBE_LANGUAGE → speech.language_code
    /// - FIELDSCRIBE_MODEL → speech.model
    /// - FIELDSCRIBE_ENDPOINT → speech.endpoint
    /// - SPEECH_API_KEY → speech.api_key
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(language) = std::env::var("FIELDSCRIBE_LANGUAGE")
            && !language.is_empty()
        {
            self.speech.language_code = language;
        }

        if let Ok(model) = std::env::var("FIELDSCRIBE_MODEL")
            && !model.is_empty()
        {
            self.speech.model = model;
        }

        if let Ok(endpoint) = std::env::var("FIELDSCRIBE_ENDPOINT")
            && !endpoint.is_empty()
        {
            self.speech.endpoint = endpoint;
        }

        if let Ok(key) = std::env::var(defaults::API_KEY_ENV)
            && !key.is_empty()
        {
            self.speech.api_key = Some(key);
        }

        self
    }

    /// Validate values the pipeline depends on.
    ///
    /// Called once at pipeline construction, before any audio is decoded.
    pub fn validate(&self) -> Result<()> {
        if self.audio.max_chunk_secs == 0 {
            return Err(FieldscribeError::InvalidConfig {
                key: "audio.max_chunk_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.audio.max_chunk_secs > defaults::MAX_SYNC_DURATION_SECS {
            return Err(FieldscribeError::InvalidConfig {
                key: "audio.max_chunk_secs".to_string(),
                message: format!(
                    "exceeds the synchronous API ceiling of {}s",
                    defaults::MAX_SYNC_DURATION_SECS
                ),
            });
        }
        if self.pipeline.max_concurrent == 0 {
            return Err(FieldscribeError::InvalidConfig {
                key: "pipeline.max_concurrent".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.speech.language_code.is_empty() {
            return Err(FieldscribeError::InvalidConfig {
                key: "speech.language_code".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/fieldscribe/config.toml on Linux
    #[cfg(feature = "cli")]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fieldscribe").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.audio.max_chunk_secs, 59);
        assert_eq!(config.speech.language_code, "hi-IN");
        assert_eq!(config.speech.model, "telephony");
        assert_eq!(config.pipeline.retry_limit, 2);
        assert_eq!(config.pipeline.max_concurrent, 2);
        assert!(config.speech.api_key.is_none());
    }

    #[test]
    fn test_default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_load_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[audio]
max_chunk_secs = 30

[speech]
language_code = "mr-IN"
model = "default"

[pipeline]
retry_limit = 5
max_concurrent = 4
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.audio.max_chunk_secs, 30);
        assert_eq!(config.speech.language_code, "mr-IN");
        assert_eq!(config.speech.model, "default");
        assert_eq!(config.pipeline.retry_limit, 5);
        assert_eq!(config.pipeline.max_concurrent, 4);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[speech]\nlanguage_code = \"en-IN\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.speech.language_code, "en-IN");
        assert_eq!(config.speech.model, "telephony");
        assert_eq!(config.audio.max_chunk_secs, 59);
    }

    #[test]
    fn test_load_missing_file_is_config_file_not_found() {
        let result = Config::load(Path::new("/nonexistent/config.toml"));
        assert!(matches!(
            result,
            Err(FieldscribeError::ConfigFileNotFound { .. })
        ));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_default_invalid_toml_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml =").unwrap();

        assert!(Config::load_or_default(file.path()).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_chunk() {
        let config = Config {
            audio: AudioConfig { max_chunk_secs: 0 },
            ..Default::default()
        };
        match config.validate() {
            Err(FieldscribeError::InvalidConfig { key, .. }) => {
                assert_eq!(key, "audio.max_chunk_secs");
            }
            other => panic!("Expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_chunk_above_ceiling() {
        let config = Config {
            audio: AudioConfig { max_chunk_secs: 60 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = Config {
            pipeline: PipelineConfig {
                retry_limit: 2,
                max_concurrent: 0,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_language() {
        let mut config = Config::default();
        config.speech.language_code = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_retry_limit_is_valid() {
        let config = Config {
            pipeline: PipelineConfig {
                retry_limit: 0,
                max_concurrent: 1,
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
