use clap::Parser;
use color_eyre::Result;
use roster::{app, config, logging};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(about = "A terminal UI for browsing and editing employee records")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/roster/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Base URL of the employee API (overrides config and ROSTER_API_URL)
  #[arg(short, long)]
  api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let config = config::Config::load(args.config.as_deref())?;
  let config = match args.api_url {
    Some(url) => config.with_api_url(url)?,
    None => config,
  };

  // Held for the process lifetime so buffered log lines get flushed
  let _log_guard = logging::init(&config.logging)?;
  info!(version = env!("CARGO_PKG_VERSION"), "Starting roster");

  let mut app = app::App::new(config)?;
  app.run().await?;

  Ok(())
}
