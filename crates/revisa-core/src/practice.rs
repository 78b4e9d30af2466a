//! Practice flows: look an item up, ask the scheduler, persist the patch.
//!
//! These helpers hold the only read-modify-write sequences in the crate. The
//! conditional update in [`ReviewStore::update_item`] makes a concurrent
//! second submission fail instead of silently overwriting the first.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::{
  item::ReviewItem,
  outcome::Outcome,
  scheduler::Scheduler,
  store::ReviewStore,
};

#[derive(Debug, Error)]
pub enum PracticeError<E> {
  #[error("review item not found: {0}")]
  NotFound(Uuid),

  #[error(transparent)]
  Store(E),
}

/// Record a review attempt for item `id` and return its new stored state.
pub async fn review<S: ReviewStore>(
  store: &S,
  scheduler: &Scheduler,
  id: Uuid,
  outcome: Outcome,
  now: DateTime<Utc>,
) -> Result<ReviewItem, PracticeError<S::Error>> {
  let item = fetch(store, id).await?;
  let patch = scheduler.record_outcome(&item, outcome, now);
  let updated = store
    .update_item(id, patch)
    .await
    .map_err(PracticeError::Store)?;

  tracing::debug!(
    item_id = %id,
    ?outcome,
    times_practiced = updated.times_practiced,
    mastery = ?updated.mastery_status,
    next_review = ?updated.next_review_date,
    "recorded review outcome"
  );
  Ok(updated)
}

/// Manually retire item `id` from the review loop.
pub async fn master<S: ReviewStore>(
  store: &S,
  scheduler: &Scheduler,
  id: Uuid,
  now: DateTime<Utc>,
) -> Result<ReviewItem, PracticeError<S::Error>> {
  let item = fetch(store, id).await?;
  let patch = scheduler.mark_mastered(&item, now);
  let updated = store
    .update_item(id, patch)
    .await
    .map_err(PracticeError::Store)?;

  tracing::debug!(
    item_id = %id,
    next_review = ?updated.next_review_date,
    "marked item as mastered"
  );
  Ok(updated)
}

/// The owner's review queue at `now`.
pub async fn due_queue<S: ReviewStore>(
  store: &S,
  owner_id: Uuid,
  now: DateTime<Utc>,
  limit: usize,
) -> Result<Vec<ReviewItem>, PracticeError<S::Error>> {
  let due = store
    .query_due(owner_id, now, limit)
    .await
    .map_err(PracticeError::Store)?;
  tracing::debug!(owner_id = %owner_id, count = due.len(), "built due queue");
  Ok(due)
}

async fn fetch<S: ReviewStore>(
  store: &S,
  id: Uuid,
) -> Result<ReviewItem, PracticeError<S::Error>> {
  store
    .get_item(id)
    .await
    .map_err(PracticeError::Store)?
    .ok_or(PracticeError::NotFound(id))
}
