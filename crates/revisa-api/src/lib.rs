//! JSON REST API for Revisa.
//!
//! Exposes an axum [`Router`] backed by any [`revisa_core::store::ReviewStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility; the
//! owner id is taken from the request as-is.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", revisa_api::api_router(state))
//! ```

pub mod due;
pub mod error;
pub mod extract;
pub mod items;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use revisa_core::{Scheduler, store::ReviewStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Queue sizing, deserialised from the `[api]` table of the server config.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  /// Queue length when the request does not specify one.
  pub due_limit:     usize,
  /// Upper bound on any requested queue length.
  pub max_due_limit: usize,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      due_limit:     20,
      max_due_limit: 100,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct ApiState<S> {
  pub store:     Arc<S>,
  pub scheduler: Scheduler,
  pub config:    ApiConfig,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      scheduler: self.scheduler,
      config:    self.config,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: ReviewStore + 'static,
{
  Router::new()
    // Items
    .route("/items", get(items::list::<S>).post(items::create::<S>))
    .route("/items/{id}", get(items::get_one::<S>))
    .route("/items/{id}/review", post(items::review_one::<S>))
    .route("/items/{id}/master", post(items::master_one::<S>))
    // Queue
    .route("/due", get(due::handler::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
