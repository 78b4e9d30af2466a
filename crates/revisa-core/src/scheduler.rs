//! The review scheduler.
//!
//! Every function here is pure: the current time is always passed in, and the
//! result is a [`ReviewItemPatch`] for the caller to persist. Nothing in this
//! module touches a store.
//!
//! # Policy
//!
//! - A miss resets the practice count to zero and schedules the item for the
//!   next day.
//! - A hit increments the count and schedules the item using
//!   [`REVIEW_INTERVALS_DAYS`], indexed by the count *before* the increment
//!   and clamped to the last entry.
//! - An item is promoted to [`MasteryStatus::Mastered`] on a hit that brings
//!   the count to at least [`SchedulerConfig::mastery_threshold`].

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  item::{MasteryStatus, ReviewItem, ReviewItemPatch},
  outcome::Outcome,
};

/// Days until the next review after the 1st, 2nd, 3rd, ... consecutive
/// correct answer. Growth stops at the last entry.
pub const REVIEW_INTERVALS_DAYS: [u32; 5] = [1, 3, 7, 14, 30];

/// Days until the next review after an incorrect answer.
pub const RETRY_INTERVAL_DAYS: u32 = 1;

pub const DEFAULT_MASTERY_THRESHOLD: u32 = 5;
pub const DEFAULT_MAINTENANCE_INTERVAL_DAYS: u32 = 90;

/// Longest horizon any review is scheduled out to, about a century.
pub const MAX_SCHEDULE_DAYS: u32 = 36_500;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Tunable scheduler parameters, deserialised from the `[scheduler]` table of
/// the server config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
  /// Consecutive correct answers needed before an item counts as mastered.
  pub mastery_threshold:         u32,
  /// Horizon used by [`Scheduler::mark_mastered`].
  pub maintenance_interval_days: u32,
}

impl Default for SchedulerConfig {
  fn default() -> Self {
    Self {
      mastery_threshold:         DEFAULT_MASTERY_THRESHOLD,
      maintenance_interval_days: DEFAULT_MAINTENANCE_INTERVAL_DAYS,
    }
  }
}

// ─── Scheduler ───────────────────────────────────────────────────────────────

/// Stateless review scheduler. Cheap to copy and safe to share across tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scheduler {
  config: SchedulerConfig,
}

impl Scheduler {
  pub fn new(config: SchedulerConfig) -> Self { Self { config } }

  pub fn config(&self) -> &SchedulerConfig { &self.config }

  /// Compute the state an item moves to after a review attempt at `now`.
  ///
  /// Callers must have already checked that the item exists; this function
  /// cannot fail.
  pub fn record_outcome(
    &self,
    item: &ReviewItem,
    outcome: Outcome,
    now: DateTime<Utc>,
  ) -> ReviewItemPatch {
    let (times_practiced, interval_days) = match outcome {
      Outcome::Incorrect => (0, RETRY_INTERVAL_DAYS),
      Outcome::Correct => (
        item.times_practiced.saturating_add(1),
        interval_for(item.times_practiced),
      ),
    };

    let mastery_status = if outcome.is_correct()
      && times_practiced >= self.config.mastery_threshold
    {
      MasteryStatus::Mastered
    } else {
      MasteryStatus::Learning
    };

    ReviewItemPatch {
      base_revision: item.revision,
      times_practiced,
      mastery_status,
      next_review_date: Some(add_days(now, interval_days)),
      last_practiced_at: Some(now),
      total_reviews: item.total_reviews.saturating_add(1),
      correct_reviews: item
        .correct_reviews
        .saturating_add(u32::from(outcome.is_correct())),
    }
  }

  /// Retire an item from the normal loop: mark it mastered and push its next
  /// review out by the maintenance interval.
  ///
  /// This is a manual override, so practice counters and `last_practiced_at`
  /// are left as they are.
  pub fn mark_mastered(
    &self,
    item: &ReviewItem,
    now: DateTime<Utc>,
  ) -> ReviewItemPatch {
    ReviewItemPatch {
      base_revision:     item.revision,
      times_practiced:   item.times_practiced,
      mastery_status:    MasteryStatus::Mastered,
      next_review_date:  Some(add_days(
        now,
        self.config.maintenance_interval_days,
      )),
      last_practiced_at: item.last_practiced_at,
      total_reviews:     item.total_reviews,
      correct_reviews:   item.correct_reviews,
    }
  }
}

/// Interval in days after a correct answer given the practice count before
/// that answer.
pub fn interval_for(times_practiced: u32) -> u32 {
  let last = REVIEW_INTERVALS_DAYS.len() - 1;
  let index = usize::try_from(times_practiced).map_or(last, |i| i.min(last));
  REVIEW_INTERVALS_DAYS[index]
}

/// `now` plus `days`, capped at [`MAX_SCHEDULE_DAYS`] and saturating at the
/// end of chrono's range.
fn add_days(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
  let days = days.min(MAX_SCHEDULE_DAYS);
  now
    .checked_add_signed(TimeDelta::days(i64::from(days)))
    .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

// ─── Due queue ───────────────────────────────────────────────────────────────

/// Build the review queue from `items` at `now`.
///
/// Mastered items and items scheduled after `now` are dropped. Never-scheduled
/// items come first, then the oldest due date; ties fall back to `created_at`
/// and finally `item_id` so the order is total. At most `limit` items are
/// returned.
pub fn select_due<I>(items: I, now: DateTime<Utc>, limit: usize) -> Vec<ReviewItem>
where
  I: IntoIterator<Item = ReviewItem>,
{
  let mut due: Vec<ReviewItem> =
    items.into_iter().filter(|item| item.is_due(now)).collect();

  // `None < Some(_)` for `Option`, which puts unscheduled items first.
  due.sort_by_key(|item| (item.next_review_date, item.created_at, item.item_id));
  due.truncate(limit);
  due
}
