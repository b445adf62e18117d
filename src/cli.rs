//! Command-line interface for fieldscribe
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Farmer-interview transcription pipeline
#[derive(Parser, Debug)]
#[command(
    name = "fieldscribe",
    version,
    about = "Transcribe long field recordings via a remote speech API"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress progress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe a recording and print the joined transcript
    Transcribe {
        /// Audio file to transcribe (wav, mp3, m4a, flac)
        file: PathBuf,

        /// Format tag override; inferred from the file extension otherwise
        #[arg(long, value_name = "FORMAT")]
        format: Option<String>,

        /// Language code for recognition (default: hi-IN)
        #[arg(long, value_name = "LANG")]
        language: Option<String>,

        /// Recognition model (default: telephony)
        #[arg(long, value_name = "MODEL")]
        model: Option<String>,

        /// Segment duration in seconds (default: 59, the sync API ceiling)
        #[arg(long, short = 'c', value_name = "SECONDS")]
        chunk_size: Option<u64>,

        /// Write the transcript to a file instead of stdout
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Also export the normalized recording as WAV
        #[arg(long, value_name = "PATH")]
        export_wav: Option<PathBuf>,
    },

    /// Split a recording into segments and show the plan without
    /// calling the remote API
    Split {
        /// Audio file to inspect
        file: PathBuf,

        /// Format tag override; inferred from the file extension otherwise
        #[arg(long, value_name = "FORMAT")]
        format: Option<String>,

        /// Segment duration in seconds (default: 59)
        #[arg(long, short = 'c', value_name = "SECONDS")]
        chunk_size: Option<u64>,
    },

    /// Validate the effective configuration and credentials
    CheckConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_transcribe() {
        let cli = Cli::try_parse_from([
            "fieldscribe",
            "transcribe",
            "interview.mp3",
            "--language",
            "mr-IN",
            "-c",
            "30",
        ])
        .unwrap();

        match cli.command {
            Commands::Transcribe {
                file,
                language,
                chunk_size,
                ..
            } => {
                assert_eq!(file, PathBuf::from("interview.mp3"));
                assert_eq!(language.as_deref(), Some("mr-IN"));
                assert_eq!(chunk_size, Some(30));
            }
            other => panic!("Expected Transcribe, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parses_split() {
        let cli = Cli::try_parse_from(["fieldscribe", "split", "a.wav"]).unwrap();
        assert!(matches!(cli.command, Commands::Split { .. }));
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from([
            "fieldscribe",
            "--config",
            "/tmp/cfg.toml",
            "-q",
            "check-config",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/cfg.toml")));
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::CheckConfig));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["fieldscribe"]).is_err());
    }
}
