//! Server configuration.
//!
//! Values come from an optional TOML file, then `REVISA_*` environment
//! variables (`__` separates nested keys, e.g.
//! `REVISA_SCHEDULER__MASTERY_THRESHOLD=3`). Every field has a default.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use revisa_api::ApiConfig;
use revisa_core::{SchedulerConfig, scheduler::MAX_SCHEDULE_DAYS};
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// SQLite database file; a leading `~/` is expanded.
  pub store_path: PathBuf,
  pub scheduler:  SchedulerConfig,
  pub api:        ApiConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       5240,
      store_path: PathBuf::from("~/.local/share/revisa/revisa.db"),
      scheduler:  SchedulerConfig::default(),
      api:        ApiConfig::default(),
    }
  }
}

impl ServerConfig {
  /// Load from `path` (if it exists) layered under the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let cfg: Self = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("REVISA")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.validate()?;
    Ok(cfg)
  }

  fn validate(&self) -> anyhow::Result<()> {
    let days = self.scheduler.maintenance_interval_days;
    anyhow::ensure!(
      days <= MAX_SCHEDULE_DAYS,
      "scheduler.maintenance_interval_days must be at most {MAX_SCHEDULE_DAYS}, got {days}"
    );
    anyhow::ensure!(
      self.api.due_limit <= self.api.max_due_limit,
      "api.due_limit ({}) exceeds api.max_due_limit ({})",
      self.api.due_limit,
      self.api.max_due_limit
    );
    Ok(())
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
