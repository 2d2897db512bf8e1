//! StyleScope - page style inspector
//!
//! Main entry point for the StyleScope CLI.

mod cli;
mod cmd_page;
mod cmd_pick;
mod session;

use std::path::PathBuf;

use clap::Parser;
use tracing::warn;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use stylescope_config::{ConfigLoader, ConfigValidator, LoggingConfig};

use crate::cli::{Cli, Commands};

/// Resolve the log directory, falling back to ~/.stylescope/logs.
fn log_dir(config: &LoggingConfig) -> PathBuf {
    if !config.dir.is_empty() {
        return PathBuf::from(ConfigLoader::expand_path(&config.dir));
    }
    dirs::home_dir()
        .map(|h| h.join(".stylescope").join("logs"))
        .unwrap_or_else(|| PathBuf::from(".stylescope/logs"))
}

/// Initialize tracing with console and file output.
///
/// Console output goes to stderr so command output on stdout stays clean.
fn init_tracing(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = log_dir(config);
    ConfigLoader::create_log_dir(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("stylescope")
        .filename_suffix("log")
        .max_log_files(config.max_files)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the writer flushing until exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_or_default(&cli.config)?;
    let warnings = ConfigValidator::validate(&config).into_result()?;

    init_tracing(&config.logging)?;
    for warning in warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }

    match cli.command {
        Commands::Classify { url } => cmd_page::classify(&url),
        Commands::Analyze { snapshot, format, json } => {
            cmd_page::analyze(&config, &snapshot, format, json).await
        }
        Commands::Export { snapshot, output } => {
            cmd_page::export(&config, &snapshot, output.as_deref()).await
        }
        Commands::Pick { snapshot, target, format } => {
            cmd_pick::pick(&config, &snapshot, &target, format).await
        }
    }
}
