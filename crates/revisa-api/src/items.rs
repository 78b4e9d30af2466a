//! Handlers for `/items` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/items` | `?owner_id` required |
//! | `POST` | `/items` | Body: [`NewReviewItem`]; returns 201 + stored item |
//! | `GET`  | `/items/:id` | 404 if not found |
//! | `POST` | `/items/:id/review` | Body: `{"was_correct": true}` |
//! | `POST` | `/items/:id/master` | Retire the item for the maintenance interval |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use revisa_core::{
  Outcome,
  item::{NewReviewItem, ReviewItem},
  practice,
  store::ReviewStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  extract::{JsonBody, PathParam, QueryParams},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub owner_id: Uuid,
}

/// `GET /items?owner_id=<id>`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<ReviewItem>>, ApiError>
where
  S: ReviewStore + 'static,
{
  let items = state
    .store
    .list_items(params.owner_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(items))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /items`: returns 201 + the stored [`ReviewItem`].
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  JsonBody(body): JsonBody<NewReviewItem>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ReviewStore + 'static,
{
  let item = state
    .store
    .add_item(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(item)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /items/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  PathParam(id): PathParam<Uuid>,
) -> Result<Json<ReviewItem>, ApiError>
where
  S: ReviewStore + 'static,
{
  let item = state
    .store
    .get_item(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("review item {id} not found")))?;
  Ok(Json(item))
}

// ─── Review ───────────────────────────────────────────────────────────────────

/// Body of `POST /items/:id/review`. The outcome is taken as raw JSON so a
/// non-boolean value is reported as an invalid outcome rather than a parse
/// failure.
#[derive(Debug, Deserialize)]
pub struct ReviewBody {
  #[serde(default, alias = "wasCorrect")]
  pub was_correct: serde_json::Value,
}

/// `POST /items/:id/review`: returns the item's new state.
pub async fn review_one<S>(
  State(state): State<ApiState<S>>,
  PathParam(id): PathParam<Uuid>,
  JsonBody(body): JsonBody<ReviewBody>,
) -> Result<Json<ReviewItem>, ApiError>
where
  S: ReviewStore + 'static,
{
  let outcome = Outcome::from_json(&body.was_correct)?;
  let item =
    practice::review(state.store.as_ref(), &state.scheduler, id, outcome, Utc::now()).await?;
  Ok(Json(item))
}

// ─── Master ───────────────────────────────────────────────────────────────────

/// `POST /items/:id/master`: manual override, no body.
pub async fn master_one<S>(
  State(state): State<ApiState<S>>,
  PathParam(id): PathParam<Uuid>,
) -> Result<Json<ReviewItem>, ApiError>
where
  S: ReviewStore + 'static,
{
  let item = practice::master(state.store.as_ref(), &state.scheduler, id, Utc::now()).await?;
  Ok(Json(item))
}
