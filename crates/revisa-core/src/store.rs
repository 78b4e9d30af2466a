//! The `ReviewStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `revisa-store-sqlite`).
//! Higher layers (`revisa-api`, [`crate::practice`]) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::item::{NewReviewItem, ReviewItem, ReviewItemPatch};

/// Error type of a [`ReviewStore`] backend.
///
/// Backends surface missing rows and lost conditional updates as the
/// corresponding [`crate::Error`] variants so higher layers can tell them
/// apart from I/O failures without knowing the backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The core error this failure represents, if any.
  fn as_core(&self) -> Option<&crate::Error> { None }
}

/// Abstraction over a review-item store backend.
///
/// The store owns persistence only. Every scheduling decision arrives as a
/// [`ReviewItemPatch`] computed by the
/// [`Scheduler`](crate::scheduler::Scheduler).
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ReviewStore: Send + Sync {
  type Error: StoreError;

  /// Create and persist a new item. The store assigns the id, `created_at`,
  /// and the initial (unscheduled, learning) state.
  ///
  /// An owner holds at most one item per vocabulary word: saving a word the
  /// owner already has returns the existing item unchanged.
  fn add_item(
    &self,
    input: NewReviewItem,
  ) -> impl Future<Output = Result<ReviewItem, Self::Error>> + Send + '_;

  /// Retrieve an item by UUID. Returns `None` if not found.
  fn get_item(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ReviewItem>, Self::Error>> + Send + '_;

  /// Apply `patch` to the item as one atomic conditional update.
  ///
  /// The write succeeds only if the stored revision still equals
  /// `patch.base_revision`; otherwise an error is returned and nothing is
  /// written. Returns the item as stored after the update.
  fn update_item(
    &self,
    id: Uuid,
    patch: ReviewItemPatch,
  ) -> impl Future<Output = Result<ReviewItem, Self::Error>> + Send + '_;

  /// List all of an owner's items, oldest first.
  fn list_items(
    &self,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ReviewItem>, Self::Error>> + Send + '_;

  /// Return at most `limit` of the owner's items that are due at `now`, in
  /// the order defined by [`crate::scheduler::select_due`].
  fn query_due(
    &self,
    owner_id: Uuid,
    now: DateTime<Utc>,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<ReviewItem>, Self::Error>> + Send + '_;
}
