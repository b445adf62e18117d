use anyhow::Result;
use clap::Parser;
use fieldscribe::app::{run_check_config_command, run_split_command, run_transcribe_command};
use fieldscribe::cli::{Cli, Commands};
use fieldscribe::config::Config;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.quiet);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Transcribe {
            file,
            format,
            language,
            model,
            chunk_size,
            out,
            export_wav,
        } => {
            run_transcribe_command(
                config,
                &file,
                format.as_deref(),
                language.as_deref(),
                model.as_deref(),
                chunk_size,
                out.as_deref(),
                export_wav.as_deref(),
                cli.quiet,
            )
            .await?;
        }
        Commands::Split {
            file,
            format,
            chunk_size,
        } => {
            run_split_command(config, &file, format.as_deref(), chunk_size)?;
        }
        Commands::CheckConfig => {
            run_check_config_command(config)?;
        }
    }

    Ok(())
}

/// Initialize tracing to stderr; RUST_LOG overrides the default level.
fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load config from the given path, the default location, or defaults,
/// then apply environment overrides.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => match Config::default_path() {
            Some(path) => Config::load_or_default(&path)?,
            None => Config::default(),
        },
    };
    Ok(config.with_env_overrides())
}
