//! Application entry points behind the CLI.
//!
//! Composes the complete flow for one recording:
//! decode → chunk → orchestrate → print transcript + failure manifest

use crate::audio::{self, AudioFormat};
use crate::config::Config;
use crate::error::{FieldscribeError, Result};
use crate::pipeline::progress::{LogSink, NullSink, ProgressSink};
use crate::pipeline::{Orchestrator, OrchestratorConfig, PipelineRun};
use crate::transcribe::{RecognizeClient, RecognizeConfig, TranscribeError};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Resolves the audio format from an explicit tag or the file extension.
fn resolve_format(file: &Path, tag: Option<&str>) -> Result<AudioFormat> {
    match tag {
        Some(tag) => AudioFormat::from_tag(tag),
        None => {
            let extension = file
                .extension()
                .and_then(|e| e.to_str())
                .ok_or_else(|| FieldscribeError::UnsupportedFormat {
                    format: file.display().to_string(),
                    message: "no file extension; pass --format".to_string(),
                })?;
            AudioFormat::from_tag(extension)
        }
    }
}

/// Run the transcribe command: decode → chunk → orchestrate → output.
#[allow(clippy::too_many_arguments)]
pub async fn run_transcribe_command(
    mut config: Config,
    file: &Path,
    format: Option<&str>,
    language: Option<&str>,
    model: Option<&str>,
    chunk_size: Option<u64>,
    out: Option<&Path>,
    export_wav: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    // Apply CLI overrides
    if let Some(l) = language {
        config.speech.language_code = l.to_string();
    }
    if let Some(m) = model {
        config.speech.model = m.to_string();
    }
    if let Some(c) = chunk_size {
        config.audio.max_chunk_secs = c;
    }

    // Fail on bad settings before touching any audio
    config.validate()?;

    let format = resolve_format(file, format)?;
    let bytes = std::fs::read(file)?;

    let buffer = audio::decode(&bytes, format)?;
    tracing::info!(
        duration_secs = buffer.duration().as_secs_f64(),
        sample_rate = buffer.sample_rate(),
        "decoded recording"
    );

    let segments = audio::split(&buffer, Duration::from_secs(config.audio.max_chunk_secs))?;
    if !quiet {
        eprintln!(
            "fieldscribe: split {:.1}s of audio into {} segment(s)",
            buffer.duration().as_secs_f64(),
            segments.len()
        );
    }

    let api_key = config.speech.api_key.clone().unwrap_or_default();
    let client = RecognizeClient::new(RecognizeConfig::new(config.speech.endpoint.clone(), api_key))
        .map_err(FieldscribeError::Transcribe)?;

    let sink: Arc<dyn ProgressSink> = if quiet {
        Arc::new(NullSink)
    } else {
        Arc::new(LogSink)
    };

    let orchestrator = Orchestrator::new(Arc::new(client), OrchestratorConfig::from_config(&config))
        .with_progress_sink(sink);

    let run = orchestrator.run(segments).await?;

    report_run(&run, out, quiet)?;

    if let Some(path) = export_wav {
        std::fs::write(path, audio::encode_wav(&buffer)?)?;
        if !quiet {
            eprintln!("fieldscribe: exported normalized audio to {}", path.display());
        }
    }

    Ok(())
}

/// Writes the transcript and failure manifest for a finished run.
fn report_run(run: &PipelineRun, out: Option<&Path>, quiet: bool) -> Result<()> {
    let transcript = run.transcript().ok_or_else(|| {
        FieldscribeError::Other("run ended before all segments finished".to_string())
    })?;

    match out {
        Some(path) => std::fs::write(path, &transcript)?,
        None => println!("{transcript}"),
    }

    if !quiet {
        let counts = run.counts();
        eprintln!(
            "fieldscribe: {} segment(s) transcribed, {} failed, in {:.1}s",
            counts.succeeded,
            counts.failed,
            run.elapsed().as_secs_f64()
        );
        for failure in run.failures() {
            let cause = failure
                .error
                .as_ref()
                .map(TranscribeError::to_string)
                .unwrap_or_else(|| "unknown cause".to_string());
            eprintln!(
                "fieldscribe: segment {} failed after {} attempt(s): {}",
                failure.index + 1,
                failure.attempt_count,
                cause
            );
        }
    }

    Ok(())
}

/// Run the split command: show the chunking plan without remote calls.
pub fn run_split_command(
    config: Config,
    file: &Path,
    format: Option<&str>,
    chunk_size: Option<u64>,
) -> Result<()> {
    let mut config = config;
    if let Some(c) = chunk_size {
        config.audio.max_chunk_secs = c;
    }
    config.validate()?;

    let format = resolve_format(file, format)?;
    let bytes = std::fs::read(file)?;
    let buffer = audio::decode(&bytes, format)?;
    let segments = audio::split(&buffer, Duration::from_secs(config.audio.max_chunk_secs))?;

    println!(
        "{} ({:.1}s at {}Hz) → {} segment(s)",
        file.display(),
        buffer.duration().as_secs_f64(),
        buffer.sample_rate(),
        segments.len()
    );
    for segment in &segments {
        println!(
            "  #{:<3} {}  ({} samples, {} bytes encoded)",
            segment.index,
            segment.time_label(),
            segment.len_samples(),
            segment.audio.len()
        );
    }

    Ok(())
}

/// Run the check-config command: validate settings and credentials.
pub fn run_check_config_command(config: Config) -> Result<()> {
    config.validate()?;

    println!("endpoint:       {}", config.speech.endpoint);
    println!("language:       {}", config.speech.language_code);
    println!("model:          {}", config.speech.model);
    println!("max chunk:      {}s", config.audio.max_chunk_secs);
    println!("retry limit:    {}", config.pipeline.retry_limit);
    println!("max concurrent: {}", config.pipeline.max_concurrent);

    match config.speech.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => println!("api key:        configured"),
        _ => println!(
            "api key:        MISSING (set {} or speech.api_key)",
            crate::defaults::API_KEY_ENV
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format_from_extension() {
        let format = resolve_format(Path::new("interview.mp3"), None).unwrap();
        assert_eq!(format, AudioFormat::Mp3);
    }

    #[test]
    fn test_resolve_format_tag_wins_over_extension() {
        let format = resolve_format(Path::new("interview.bin"), Some("flac")).unwrap();
        assert_eq!(format, AudioFormat::Flac);
    }

    #[test]
    fn test_resolve_format_no_extension_is_error() {
        let result = resolve_format(Path::new("interview"), None);
        assert!(matches!(
            result,
            Err(FieldscribeError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_check_config_rejects_invalid() {
        let mut config = Config::default();
        config.audio.max_chunk_secs = 0;
        assert!(run_check_config_command(config).is_err());
    }
}
