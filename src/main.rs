mod app;
mod cache;
mod catalog;
mod config;
mod event;
mod logging;
mod mutation;
mod query;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "prodcat")]
#[command(about = "A terminal UI for browsing and editing a remote product catalog")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/prodcat/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Base URL of the product service
  #[arg(short, long)]
  url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let mut config = config::Config::load(args.config.as_deref())?;
  if let Some(url) = args.url {
    config.api.url = url;
  }

  // Keep the guard alive so buffered log lines are flushed on exit
  let _log_guard = logging::init()?;
  tracing::info!(url = %config.api.url, "starting prodcat");

  let mut app = app::App::new(config)?;
  app.run().await?;

  Ok(())
}
