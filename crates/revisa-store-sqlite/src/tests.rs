//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use revisa_core::{
  Outcome, Scheduler, SchedulerConfig,
  item::{
    CorrectionValue, ItemContent, MasteryStatus, NewReviewItem, VocabularyValue,
  },
  practice::{self, PracticeError},
  store::{ReviewStore, StoreError},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn t0() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn days(n: i64) -> TimeDelta { TimeDelta::days(n) }

fn correction(owner_id: Uuid) -> NewReviewItem {
  NewReviewItem {
    owner_id,
    content: ItemContent::Correction(CorrectionValue {
      mistake:          "eu gosto de ir no cinema".into(),
      correction:       "eu gosto de ir ao cinema".into(),
      explanation:      "ir takes the preposition a".into(),
      grammar_category: "prepositions".into(),
      confidence_score: 2,
    }),
  }
}

fn vocabulary(owner_id: Uuid, word: &str) -> NewReviewItem {
  NewReviewItem {
    owner_id,
    content: ItemContent::Vocabulary(VocabularyValue {
      word:        word.into(),
      translation: "placeholder".into(),
      context:     Some(format!("frase com {word}")),
    }),
  }
}

// ─── Items ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_item() {
  let s = store().await;
  let owner = Uuid::new_v4();

  let item = s.add_item(correction(owner)).await.unwrap();
  assert_eq!(item.times_practiced, 0);
  assert_eq!(item.mastery_status, MasteryStatus::Learning);
  assert!(item.next_review_date.is_none());
  assert_eq!(item.revision, 0);

  let fetched = s.get_item(item.item_id).await.unwrap().unwrap();
  assert_eq!(fetched, item);
}

#[tokio::test]
async fn get_item_missing_returns_none() {
  let s = store().await;
  assert!(s.get_item(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_items_is_scoped_to_owner() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();
  s.add_item(correction(alice)).await.unwrap();
  s.add_item(vocabulary(alice, "saudade")).await.unwrap();
  s.add_item(vocabulary(bob, "cafuné")).await.unwrap();

  let items = s.list_items(alice).await.unwrap();
  assert_eq!(items.len(), 2);
  assert!(items.iter().all(|i| i.owner_id == alice));
  assert!(items[0].created_at <= items[1].created_at);
}

#[tokio::test]
async fn saving_a_word_twice_keeps_one_item() {
  let s = store().await;
  let owner = Uuid::new_v4();

  let first = s.add_item(vocabulary(owner, "saudade")).await.unwrap();
  let patch = Scheduler::default().record_outcome(&first, Outcome::Correct, t0());
  let reviewed = s.update_item(first.item_id, patch).await.unwrap();

  let again = s.add_item(vocabulary(owner, "saudade")).await.unwrap();
  assert_eq!(again, reviewed);

  assert_eq!(s.list_items(owner).await.unwrap().len(), 1);
  let due = s.query_due(owner, t0() + days(1), 20).await.unwrap();
  assert_eq!(due.len(), 1);

  // The key is per owner, and corrections are never merged.
  let other = s.add_item(vocabulary(Uuid::new_v4(), "saudade")).await.unwrap();
  assert_ne!(other.item_id, first.item_id);
  s.add_item(correction(owner)).await.unwrap();
  s.add_item(correction(owner)).await.unwrap();
  assert_eq!(s.list_items(owner).await.unwrap().len(), 3);
}

// ─── Conditional update ──────────────────────────────────────────────────────

#[tokio::test]
async fn update_applies_patch_and_bumps_revision() {
  let s = store().await;
  let item = s.add_item(correction(Uuid::new_v4())).await.unwrap();

  let patch = Scheduler::default().record_outcome(&item, Outcome::Correct, t0());
  let updated = s.update_item(item.item_id, patch).await.unwrap();

  assert_eq!(updated.revision, 1);
  assert_eq!(updated.times_practiced, 1);
  assert_eq!(updated.next_review_date, Some(t0() + days(1)));
  assert_eq!(updated.last_practiced_at, Some(t0()));
  assert_eq!((updated.total_reviews, updated.correct_reviews), (1, 1));
  assert_eq!(updated, item.patched(&patch));
}

#[tokio::test]
async fn stale_patch_is_rejected() {
  let s = store().await;
  let scheduler = Scheduler::default();
  let item = s.add_item(correction(Uuid::new_v4())).await.unwrap();

  // Two submissions computed from the same snapshot.
  let first = scheduler.record_outcome(&item, Outcome::Correct, t0());
  let second = scheduler.record_outcome(&item, Outcome::Incorrect, t0());

  s.update_item(item.item_id, first).await.unwrap();
  let err = s.update_item(item.item_id, second).await.unwrap_err();
  assert!(matches!(
    err.as_core(),
    Some(revisa_core::Error::RevisionConflict { expected: 0, found: 1, .. })
  ));

  let stored = s.get_item(item.item_id).await.unwrap().unwrap();
  assert_eq!(stored.times_practiced, 1);
}

#[tokio::test]
async fn update_missing_item_errors() {
  let s = store().await;
  let item = s.add_item(correction(Uuid::new_v4())).await.unwrap();
  let patch = Scheduler::default().record_outcome(&item, Outcome::Correct, t0());

  let missing = Uuid::new_v4();
  let err = s.update_item(missing, patch).await.unwrap_err();
  assert!(matches!(
    err.as_core(),
    Some(revisa_core::Error::ItemNotFound(id)) if *id == missing
  ));
}

// ─── Due queue ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn query_due_orders_and_filters() {
  let s = store().await;
  let scheduler = Scheduler::default();
  let owner = Uuid::new_v4();

  let unscheduled = s.add_item(vocabulary(owner, "a")).await.unwrap();
  let overdue = s.add_item(vocabulary(owner, "b")).await.unwrap();
  let future = s.add_item(vocabulary(owner, "c")).await.unwrap();
  let mastered = s.add_item(vocabulary(owner, "d")).await.unwrap();
  s.add_item(vocabulary(Uuid::new_v4(), "other owner")).await.unwrap();

  let now = t0() + days(10);

  // Reviewed on t0, due t0 + 1d: overdue by `now`.
  let p = scheduler.record_outcome(&overdue, Outcome::Correct, t0());
  s.update_item(overdue.item_id, p).await.unwrap();
  // Reviewed just now: due tomorrow.
  let p = scheduler.record_outcome(&future, Outcome::Incorrect, now);
  s.update_item(future.item_id, p).await.unwrap();
  // Retired long ago but its maintenance date has passed: still excluded.
  let p = scheduler.mark_mastered(&mastered, t0() - days(100));
  s.update_item(mastered.item_id, p).await.unwrap();

  let due = s.query_due(owner, now, 10).await.unwrap();
  let ids: Vec<_> = due.iter().map(|i| i.item_id).collect();
  assert_eq!(ids, vec![unscheduled.item_id, overdue.item_id]);

  let again = s.query_due(owner, now, 10).await.unwrap();
  assert_eq!(due, again);

  let first_only = s.query_due(owner, now, 1).await.unwrap();
  assert_eq!(first_only.len(), 1);
  assert_eq!(first_only[0].item_id, unscheduled.item_id);
}

#[tokio::test]
async fn query_due_orders_by_oldest_due_date() {
  let s = store().await;
  let scheduler = Scheduler::default();
  let owner = Uuid::new_v4();

  let recent = s.add_item(correction(owner)).await.unwrap();
  let older = s.add_item(correction(owner)).await.unwrap();

  let p = scheduler.record_outcome(&recent, Outcome::Incorrect, t0() - days(1));
  s.update_item(recent.item_id, p).await.unwrap();
  let p = scheduler.record_outcome(&older, Outcome::Incorrect, t0() - days(5));
  s.update_item(older.item_id, p).await.unwrap();

  let due = s.query_due(owner, t0(), 10).await.unwrap();
  let ids: Vec<_> = due.iter().map(|i| i.item_id).collect();
  assert_eq!(ids, vec![older.item_id, recent.item_id]);
}

// ─── Practice flows ──────────────────────────────────────────────────────────

#[tokio::test]
async fn practice_review_walks_the_schedule() {
  let s = store().await;
  let scheduler = Scheduler::new(SchedulerConfig { mastery_threshold: 3, ..Default::default() });
  let item = s.add_item(correction(Uuid::new_v4())).await.unwrap();

  let mut now = t0();
  let mut expected_gaps = vec![];
  for _ in 0..3 {
    let updated = practice::review(&s, &scheduler, item.item_id, Outcome::Correct, now)
      .await
      .unwrap();
    let next = updated.next_review_date.unwrap();
    expected_gaps.push((next - now).num_days());
    now = next;
  }
  assert_eq!(expected_gaps, vec![1, 3, 7]);

  let stored = s.get_item(item.item_id).await.unwrap().unwrap();
  assert_eq!(stored.times_practiced, 3);
  assert_eq!(stored.mastery_status, MasteryStatus::Mastered);

  let reset = practice::review(&s, &scheduler, item.item_id, Outcome::Incorrect, now)
    .await
    .unwrap();
  assert_eq!(reset.times_practiced, 0);
  assert_eq!(reset.mastery_status, MasteryStatus::Learning);
  assert_eq!(reset.next_review_date, Some(now + days(1)));
  assert_eq!((reset.total_reviews, reset.correct_reviews), (4, 3));
}

#[tokio::test]
async fn practice_master_sets_maintenance_date() {
  let s = store().await;
  let scheduler = Scheduler::default();
  let owner = Uuid::new_v4();
  let item = s.add_item(vocabulary(owner, "cafuné")).await.unwrap();

  let mastered = practice::master(&s, &scheduler, item.item_id, t0()).await.unwrap();
  assert_eq!(mastered.mastery_status, MasteryStatus::Mastered);
  assert_eq!(mastered.next_review_date, Some(t0() + days(90)));
  assert!(mastered.last_practiced_at.is_none());

  let due = practice::due_queue(&s, owner, t0() + days(365), 20).await.unwrap();
  assert!(due.is_empty());
}

#[tokio::test]
async fn practice_on_missing_item_is_not_found() {
  let s = store().await;
  let scheduler = Scheduler::default();
  let id = Uuid::new_v4();

  let err = practice::review(&s, &scheduler, id, Outcome::Correct, t0())
    .await
    .unwrap_err();
  assert!(matches!(err, PracticeError::NotFound(missing) if missing == id));

  let err = practice::master(&s, &scheduler, id, t0()).await.unwrap_err();
  assert!(matches!(err, PracticeError::NotFound(_)));
}
