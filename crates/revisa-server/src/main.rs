//! `revisa`, the Revisa review-scheduling server.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, and serves the JSON API under `/api`.
//!
//! # Usage
//!
//! ```
//! revisa --config ~/.config/revisa/config.toml
//! REVISA_PORT=8080 REVISA_SCHEDULER__MASTERY_THRESHOLD=3 revisa
//! ```

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use revisa_api::ApiState;
use revisa_core::Scheduler;
use revisa_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::{ServerConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "Revisa review-scheduling server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Override the listen port from the config file.
  #[arg(long)]
  port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut server_cfg = ServerConfig::load(&cli.config)?;
  if let Some(port) = cli.port {
    server_cfg.port = port;
  }

  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  tracing::info!(
    mastery_threshold = server_cfg.scheduler.mastery_threshold,
    maintenance_days = server_cfg.scheduler.maintenance_interval_days,
    "scheduler configured"
  );

  let state = ApiState {
    store:     Arc::new(store),
    scheduler: Scheduler::new(server_cfg.scheduler),
    config:    server_cfg.api,
  };

  let app = axum::Router::new().nest("/api", revisa_api::api_router(state));
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
