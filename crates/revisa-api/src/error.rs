//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use revisa_core::{practice::PracticeError, store::StoreError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error by the core failure it carries.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    match e.as_core() {
      Some(revisa_core::Error::ItemNotFound(id)) => {
        Self::NotFound(format!("review item {id} not found"))
      }
      Some(conflict @ revisa_core::Error::RevisionConflict { .. }) => {
        Self::Conflict(conflict.to_string())
      }
      _ => Self::Store(Box::new(e)),
    }
  }
}

impl<E: StoreError> From<PracticeError<E>> for ApiError {
  fn from(e: PracticeError<E>) -> Self {
    match e {
      PracticeError::NotFound(id) => {
        Self::NotFound(format!("review item {id} not found"))
      }
      PracticeError::Store(e) => Self::from_store(e),
    }
  }
}

impl From<revisa_core::Error> for ApiError {
  fn from(e: revisa_core::Error) -> Self {
    match e {
      revisa_core::Error::ItemNotFound(id) => {
        Self::NotFound(format!("review item {id} not found"))
      }
      e @ revisa_core::Error::RevisionConflict { .. } => {
        Self::Conflict(e.to_string())
      }
      e @ revisa_core::Error::InvalidOutcome(_) => Self::BadRequest(e.to_string()),
      e => Self::Store(Box::new(e)),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self { Self::BadRequest(r.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(r: QueryRejection) -> Self { Self::BadRequest(r.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(r: PathRejection) -> Self { Self::BadRequest(r.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
