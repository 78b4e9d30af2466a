//! Error types for `revisa-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("review item not found: {0}")]
  ItemNotFound(Uuid),

  #[error("invalid review outcome: {0}")]
  InvalidOutcome(String),

  #[error(
    "review item {id} was modified concurrently (expected revision \
     {expected}, found {found})"
  )]
  RevisionConflict { id: Uuid, expected: u64, found: u64 },

  #[error("unknown item kind discriminant: {0:?}")]
  UnknownItemKind(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
