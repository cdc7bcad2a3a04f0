//! File logging. The terminal belongs to the TUI, so everything goes to
//! `$XDG_DATA_HOME/roster/roster.log` (or the configured directory).

use crate::config::LoggingConfig;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "ROSTER_LOG";

const LOG_FILE: &str = "roster.log";

/// Directory the log file is written to
pub fn log_dir(config: &LoggingConfig) -> Option<PathBuf> {
  config
    .dir
    .clone()
    .or_else(|| dirs::data_dir().map(|dir| dir.join("roster")))
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
  EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
    config
      .filter
      .as_deref()
      .and_then(|f| EnvFilter::try_new(f).ok())
      .unwrap_or_else(|| EnvFilter::new("info"))
  })
}

/// Install the global subscriber. Keep the returned guard alive until exit
/// or buffered lines are lost.
pub fn init(config: &LoggingConfig) -> Result<WorkerGuard> {
  let dir = log_dir(config).ok_or_else(|| eyre!("Could not determine a log directory"))?;
  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::registry()
    .with(env_filter(config))
    .with(
      tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false),
    )
    .try_init()
    .map_err(|e| eyre!("Failed to install logger: {}", e))?;

  Ok(guard)
}
