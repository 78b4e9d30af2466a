//! Error type for `revisa-store-sqlite`.

use revisa_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Missing items and lost conditional updates are reported through the
  /// matching core variants.
  #[error(transparent)]
  Core(#[from] revisa_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("invalid column value: {0}")]
  Decode(String),
}

impl StoreError for Error {
  fn as_core(&self) -> Option<&revisa_core::Error> {
    match self {
      Self::Core(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
