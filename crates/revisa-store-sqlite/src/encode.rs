//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with a fixed microsecond
//! precision, so lexical order in SQL matches chronological order. Item
//! content is stored as compact JSON next to its kind discriminant.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use revisa_core::item::{ItemContent, MasteryStatus, ReviewItem};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// The current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── MasteryStatus ────────────────────────────────────────────────────────────

pub fn encode_mastery(m: MasteryStatus) -> &'static str {
  match m {
    MasteryStatus::Learning => "learning",
    MasteryStatus::Mastered => "mastered",
  }
}

/// NULL is read as `learning`.
pub fn decode_mastery(s: Option<&str>) -> Result<MasteryStatus> {
  match s {
    None | Some("learning") => Ok(MasteryStatus::Learning),
    Some("mastered") => Ok(MasteryStatus::Mastered),
    Some(other) => Err(Error::Decode(format!("unknown mastery status: {other:?}"))),
  }
}

// ─── Counters ─────────────────────────────────────────────────────────────────

fn decode_u32(column: &str, v: i64) -> Result<u32> {
  u32::try_from(v).map_err(|_| Error::Decode(format!("{column} out of range: {v}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching the field order of [`RawItem`].
pub const ITEM_COLUMNS: &str = "item_id, owner_id, kind, content_json, \
  times_practiced, mastery_status, next_review_date, last_practiced_at, \
  total_reviews, correct_reviews, revision, created_at";

/// Raw values read directly from a `review_items` row.
pub struct RawItem {
  pub item_id:           String,
  pub owner_id:          String,
  pub kind:              String,
  pub content_json:      String,
  pub times_practiced:   i64,
  pub mastery_status:    Option<String>,
  pub next_review_date:  Option<String>,
  pub last_practiced_at: Option<String>,
  pub total_reviews:     i64,
  pub correct_reviews:   i64,
  pub revision:          i64,
  pub created_at:        String,
}

impl RawItem {
  /// Read a row selected with [`ITEM_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      item_id:           row.get(0)?,
      owner_id:          row.get(1)?,
      kind:              row.get(2)?,
      content_json:      row.get(3)?,
      times_practiced:   row.get(4)?,
      mastery_status:    row.get(5)?,
      next_review_date:  row.get(6)?,
      last_practiced_at: row.get(7)?,
      total_reviews:     row.get(8)?,
      correct_reviews:   row.get(9)?,
      revision:          row.get(10)?,
      created_at:        row.get(11)?,
    })
  }

  pub fn into_item(self) -> Result<ReviewItem> {
    let content_json: serde_json::Value = serde_json::from_str(&self.content_json)?;
    let content = ItemContent::from_parts(&self.kind, content_json)?;

    let revision = u64::try_from(self.revision)
      .map_err(|_| Error::Decode(format!("negative revision: {}", self.revision)))?;

    Ok(ReviewItem {
      item_id: decode_uuid(&self.item_id)?,
      owner_id: decode_uuid(&self.owner_id)?,
      content,
      times_practiced: decode_u32("times_practiced", self.times_practiced)?,
      mastery_status: decode_mastery(self.mastery_status.as_deref())?,
      next_review_date: self.next_review_date.as_deref().map(decode_dt).transpose()?,
      last_practiced_at: self
        .last_practiced_at
        .as_deref()
        .map(decode_dt)
        .transpose()?,
      total_reviews: decode_u32("total_reviews", self.total_reviews)?,
      correct_reviews: decode_u32("correct_reviews", self.correct_reviews)?,
      revision,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
