//! Handler for `GET /due`: the owner's review queue.

use axum::{
  Json,
  extract::State,
};
use chrono::Utc;
use revisa_core::{item::ReviewItem, practice, store::ReviewStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError, extract::QueryParams};

#[derive(Debug, Deserialize)]
pub struct DueParams {
  pub owner_id: Uuid,
  /// Defaults to [`crate::ApiConfig::due_limit`]; capped at
  /// [`crate::ApiConfig::max_due_limit`].
  pub limit:    Option<usize>,
}

/// `GET /due?owner_id=<id>[&limit=<n>]`
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  QueryParams(params): QueryParams<DueParams>,
) -> Result<Json<Vec<ReviewItem>>, ApiError>
where
  S: ReviewStore + 'static,
{
  let limit = params
    .limit
    .unwrap_or(state.config.due_limit)
    .min(state.config.max_due_limit);

  let due = practice::due_queue(state.store.as_ref(), params.owner_id, Utc::now(), limit).await?;
  Ok(Json(due))
}
