//! [`SqliteStore`], the SQLite implementation of [`ReviewStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use revisa_core::{
  item::{ItemContent, MasteryStatus, NewReviewItem, ReviewItem, ReviewItemPatch},
  scheduler::select_due,
  store::ReviewStore,
};

use crate::{
  encode::{ITEM_COLUMNS, RawItem, encode_dt, encode_mastery, encode_uuid, now},
  schema::SCHEMA,
  Error, Result,
};

/// Whether an insert created a row or hit an owner's existing word.
enum AddResult {
  Inserted,
  Existing(RawItem),
}

/// What a conditional update found in the row.
enum UpdateResult {
  Updated(RawItem),
  Missing,
  Stale(i64),
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Revisa review store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::info!(path = %path.display(), "opened review store");
    Ok(store)
  }

  /// Open an in-memory store for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn to_sql_int(column: &str, v: u64) -> Result<i64> {
  i64::try_from(v).map_err(|_| Error::Decode(format!("{column} out of range: {v}")))
}

// ─── ReviewStore impl ────────────────────────────────────────────────────────

impl ReviewStore for SqliteStore {
  type Error = Error;

  async fn add_item(&self, input: NewReviewItem) -> Result<ReviewItem> {
    let item = ReviewItem {
      item_id:           Uuid::new_v4(),
      owner_id:          input.owner_id,
      content:           input.content,
      times_practiced:   0,
      mastery_status:    MasteryStatus::Learning,
      next_review_date:  None,
      last_practiced_at: None,
      total_reviews:     0,
      correct_reviews:   0,
      revision:          0,
      created_at:        now(),
    };

    let id_str       = encode_uuid(item.item_id);
    let owner_str    = encode_uuid(item.owner_id);
    let kind         = item.content.discriminant().to_owned();
    let content_str  = item.content.to_json()?.to_string();
    let mastery_str  = encode_mastery(item.mastery_status).to_owned();
    let at_str       = encode_dt(item.created_at);
    let word         = match &item.content {
      ItemContent::Vocabulary(v) => Some(v.word.clone()),
      ItemContent::Correction(_) => None,
    };

    let result = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let inserted = tx.execute(
          "INSERT INTO review_items (
             item_id, owner_id, kind, content_json, mastery_status, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT (owner_id, vocab_word) WHERE vocab_word IS NOT NULL
           DO NOTHING",
          rusqlite::params![id_str, owner_str, kind, content_str, mastery_str, at_str],
        )?;

        let result = if inserted == 0 {
          AddResult::Existing(tx.query_row(
            &format!(
              "SELECT {ITEM_COLUMNS} FROM review_items
               WHERE owner_id = ?1 AND vocab_word = ?2"
            ),
            rusqlite::params![owner_str, word],
            RawItem::from_row,
          )?)
        } else {
          AddResult::Inserted
        };

        tx.commit()?;
        Ok(result)
      })
      .await?;

    match result {
      AddResult::Inserted => {
        tracing::debug!(
          item_id = %item.item_id,
          kind = item.content.discriminant(),
          "added review item"
        );
        Ok(item)
      }
      AddResult::Existing(raw) => {
        let existing = raw.into_item()?;
        tracing::debug!(item_id = %existing.item_id, "vocabulary word already saved");
        Ok(existing)
      }
    }
  }

  async fn get_item(&self, id: Uuid) -> Result<Option<ReviewItem>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawItem> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ITEM_COLUMNS} FROM review_items WHERE item_id = ?1"),
            rusqlite::params![id_str],
            RawItem::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawItem::into_item).transpose()
  }

  async fn update_item(&self, id: Uuid, patch: ReviewItemPatch) -> Result<ReviewItem> {
    let id_str          = encode_uuid(id);
    let base_revision   = to_sql_int("revision", patch.base_revision)?;
    let times_practiced = i64::from(patch.times_practiced);
    let mastery_str     = encode_mastery(patch.mastery_status).to_owned();
    let next_str        = patch.next_review_date.map(encode_dt);
    let last_str        = patch.last_practiced_at.map(encode_dt);
    let total_reviews   = i64::from(patch.total_reviews);
    let correct_reviews = i64::from(patch.correct_reviews);

    let result = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // The revision guard makes this a compare-and-swap on the row.
        let changed = tx.execute(
          "UPDATE review_items SET
             times_practiced   = ?1,
             mastery_status    = ?2,
             next_review_date  = ?3,
             last_practiced_at = ?4,
             total_reviews     = ?5,
             correct_reviews   = ?6,
             revision          = revision + 1
           WHERE item_id = ?7 AND revision = ?8",
          rusqlite::params![
            times_practiced,
            mastery_str,
            next_str,
            last_str,
            total_reviews,
            correct_reviews,
            id_str,
            base_revision,
          ],
        )?;

        let result = if changed == 0 {
          let found: Option<i64> = tx
            .query_row(
              "SELECT revision FROM review_items WHERE item_id = ?1",
              rusqlite::params![id_str],
              |r| r.get(0),
            )
            .optional()?;
          found.map_or(UpdateResult::Missing, UpdateResult::Stale)
        } else {
          UpdateResult::Updated(tx.query_row(
            &format!("SELECT {ITEM_COLUMNS} FROM review_items WHERE item_id = ?1"),
            rusqlite::params![id_str],
            RawItem::from_row,
          )?)
        };

        tx.commit()?;
        Ok(result)
      })
      .await?;

    match result {
      UpdateResult::Updated(raw) => {
        let item = raw.into_item()?;
        tracing::debug!(item_id = %id, revision = item.revision, "applied review patch");
        Ok(item)
      }
      UpdateResult::Missing => Err(revisa_core::Error::ItemNotFound(id).into()),
      UpdateResult::Stale(found) => {
        let found = u64::try_from(found)
          .map_err(|_| Error::Decode(format!("negative revision: {found}")))?;
        tracing::warn!(
          item_id = %id,
          expected = patch.base_revision,
          found,
          "rejected stale review patch"
        );
        Err(
          revisa_core::Error::RevisionConflict {
            id,
            expected: patch.base_revision,
            found,
          }
          .into(),
        )
      }
    }
  }

  async fn list_items(&self, owner_id: Uuid) -> Result<Vec<ReviewItem>> {
    let owner_str = encode_uuid(owner_id);

    let raws: Vec<RawItem> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ITEM_COLUMNS} FROM review_items
           WHERE owner_id = ?1
           ORDER BY created_at, item_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], RawItem::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawItem::into_item).collect()
  }

  async fn query_due(
    &self,
    owner_id: Uuid,
    now:      DateTime<Utc>,
    limit:    usize,
  ) -> Result<Vec<ReviewItem>> {
    let owner_str = encode_uuid(owner_id);
    let now_str   = encode_dt(now);
    let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawItem> = self
      .conn
      .call(move |conn| {
        // Mirrors `select_due`: fixed-width timestamps compare correctly as
        // text, and hyphenated UUIDs sort like their bytes.
        let mut stmt = conn.prepare(&format!(
          "SELECT {ITEM_COLUMNS} FROM review_items
           WHERE owner_id = ?1
             AND (mastery_status IS NULL OR mastery_status != 'mastered')
             AND (next_review_date IS NULL OR next_review_date <= ?2)
           ORDER BY next_review_date IS NOT NULL, next_review_date, created_at, item_id
           LIMIT ?3"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str, now_str, limit_val], RawItem::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawItem::into_item)
      .collect::<Result<Vec<_>>>()?;

    Ok(select_due(items, now, limit))
  }
}
