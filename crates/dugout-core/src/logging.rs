// Tracing setup: log to a file so stdout stays clean for reports.

use crate::config::LoggingConfig;
use anyhow::Context;
use std::path::PathBuf;

/// Resolve the log file path from the logging config.
pub fn log_path(config: &LoggingConfig) -> PathBuf {
    PathBuf::from(&config.dir).join(&config.file)
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides the configured filter when set.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    std::fs::create_dir_all(&config.dir)
        .with_context(|| format!("failed to create log directory {}", config.dir))?;

    let path = log_path(config);
    let log_file = std::fs::File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
