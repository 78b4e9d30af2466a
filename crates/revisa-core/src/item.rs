//! Review items: the unit of learning tracked by the scheduler.
//!
//! An item is created when a mistake is recorded or a vocabulary word is
//! saved. After creation it changes only by applying a [`ReviewItemPatch`]
//! computed by the [`Scheduler`](crate::scheduler::Scheduler).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Mastery ─────────────────────────────────────────────────────────────────

/// Whether an item is still in the normal review loop.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MasteryStatus {
  #[default]
  Learning,
  Mastered,
}

impl MasteryStatus {
  pub fn is_mastered(self) -> bool { matches!(self, Self::Mastered) }
}

// ─── Content ─────────────────────────────────────────────────────────────────

/// Lowest and highest confidence a correction can carry.
pub const CONFIDENCE_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

fn default_confidence() -> u8 { *CONFIDENCE_RANGE.start() }

fn confidence_in_range<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
  let score = u8::deserialize(d)?;
  if CONFIDENCE_RANGE.contains(&score) {
    Ok(score)
  } else {
    Err(de::Error::custom(format!(
      "confidence_score must be between {} and {}, got {score}",
      CONFIDENCE_RANGE.start(),
      CONFIDENCE_RANGE.end(),
    )))
  }
}

/// A grammar mistake the learner made, with its correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionValue {
  pub mistake:          String,
  pub correction:       String,
  pub explanation:      String,
  /// Free-text grammar area, e.g. "subjunctive", "prepositions".
  pub grammar_category: String,
  /// How sure the corrector was, 1 (least) to 5. Shown to the learner.
  #[serde(
    default = "default_confidence",
    deserialize_with = "confidence_in_range"
  )]
  pub confidence_score: u8,
}

/// A saved vocabulary word or phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyValue {
  pub word:        String,
  pub translation: String,
  /// The sentence the word was first seen in, if any.
  pub context:     Option<String>,
}

/// What is being learned. The variant name is the `kind` discriminant stored
/// in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ItemContent {
  Correction(CorrectionValue),
  Vocabulary(VocabularyValue),
}

impl ItemContent {
  /// The discriminant string stored in the `kind` column.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn discriminant(&self) -> &'static str {
    match self {
      Self::Correction(_) => "correction",
      Self::Vocabulary(_) => "vocabulary",
    }
  }

  /// Serialise the inner payload (without the kind tag).
  pub fn to_json(&self) -> Result<serde_json::Value> {
    let full = serde_json::to_value(self)?;
    Ok(full.get("data").cloned().unwrap_or(serde_json::Value::Null))
  }

  /// Rebuild content from the stored discriminant and JSON payload.
  pub fn from_parts(
    discriminant: &str,
    data: serde_json::Value,
  ) -> Result<Self> {
    if !matches!(discriminant, "correction" | "vocabulary") {
      return Err(Error::UnknownItemKind(discriminant.to_owned()));
    }
    let wrapped = serde_json::json!({ "kind": discriminant, "data": data });
    Ok(serde_json::from_value(wrapped)?)
  }
}

// ─── ReviewItem ──────────────────────────────────────────────────────────────

/// The persistent review state of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
  pub item_id:           Uuid,
  pub owner_id:          Uuid,
  pub content:           ItemContent,
  /// Consecutive correct reviews since the last miss.
  pub times_practiced:   u32,
  pub mastery_status:    MasteryStatus,
  /// `None` means the item has never been scheduled and is due immediately.
  pub next_review_date:  Option<DateTime<Utc>>,
  pub last_practiced_at: Option<DateTime<Utc>>,
  pub total_reviews:     u32,
  pub correct_reviews:   u32,
  /// Row version; bumped by the store on every applied patch.
  pub revision:          u64,
  /// Store-assigned; never changes after creation.
  pub created_at:        DateTime<Utc>,
}

impl ReviewItem {
  /// Whether the item belongs in the review queue at `now`.
  pub fn is_due(&self, now: DateTime<Utc>) -> bool {
    if self.mastery_status.is_mastered() {
      return false;
    }
    self.next_review_date.is_none_or(|next| next <= now)
  }

  /// Copy of this item with `patch` applied, as the store would persist it.
  pub fn patched(&self, patch: &ReviewItemPatch) -> Self {
    Self {
      times_practiced: patch.times_practiced,
      mastery_status: patch.mastery_status,
      next_review_date: patch.next_review_date,
      last_practiced_at: patch.last_practiced_at,
      total_reviews: patch.total_reviews,
      correct_reviews: patch.correct_reviews,
      revision: self.revision + 1,
      ..self.clone()
    }
  }
}

// ─── NewReviewItem ───────────────────────────────────────────────────────────

/// Input to [`crate::store::ReviewStore::add_item`]. Identity, timestamps and
/// scheduling state are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReviewItem {
  pub owner_id: Uuid,
  pub content:  ItemContent,
}

// ─── ReviewItemPatch ─────────────────────────────────────────────────────────

/// The full set of scheduling fields produced by one scheduler decision.
///
/// `base_revision` is the revision of the item the patch was computed from;
/// a store must refuse the patch if the row has moved on since.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewItemPatch {
  pub base_revision:     u64,
  pub times_practiced:   u32,
  pub mastery_status:    MasteryStatus,
  pub next_review_date:  Option<DateTime<Utc>>,
  pub last_practiced_at: Option<DateTime<Utc>>,
  pub total_reviews:     u32,
  pub correct_reviews:   u32,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn vocab() -> ItemContent {
    ItemContent::Vocabulary(VocabularyValue {
      word:        "saudade".into(),
      translation: "longing".into(),
      context:     None,
    })
  }

  #[test]
  fn content_parts_roundtrip() {
    let content = vocab();
    let data = content.to_json().unwrap();
    assert!(data.get("kind").is_none());
    let back = ItemContent::from_parts(content.discriminant(), data).unwrap();
    assert_eq!(back, content);
  }

  fn correction(confidence_score: u8) -> ItemContent {
    ItemContent::Correction(CorrectionValue {
      mistake: "ela é cansada".into(),
      correction: "ela está cansada".into(),
      explanation: "tiredness is a state".into(),
      grammar_category: "ser_estar".into(),
      confidence_score,
    })
  }

  #[test]
  fn correction_keeps_confidence_through_parts() {
    let content = correction(4);
    let data = content.to_json().unwrap();
    assert_eq!(data["confidence_score"], 4);
    let back = ItemContent::from_parts("correction", data).unwrap();
    assert_eq!(back, content);
  }

  #[test]
  fn missing_confidence_defaults_to_one() {
    let data = serde_json::json!({
      "mistake": "ela é cansada",
      "correction": "ela está cansada",
      "explanation": "tiredness is a state",
      "grammar_category": "ser_estar",
    });
    let back = ItemContent::from_parts("correction", data).unwrap();
    assert_eq!(back, correction(1));
  }

  #[test]
  fn out_of_range_confidence_is_rejected() {
    for score in [0, 6] {
      let mut data = correction(1).to_json().unwrap();
      data["confidence_score"] = serde_json::json!(score);
      let err = ItemContent::from_parts("correction", data).unwrap_err();
      assert!(matches!(err, Error::Serialization(_)));
    }
  }

  #[test]
  fn unknown_discriminant_is_rejected() {
    let err = ItemContent::from_parts("lesson", serde_json::json!({}))
      .unwrap_err();
    assert!(matches!(err, Error::UnknownItemKind(k) if k == "lesson"));
  }

  #[test]
  fn mastery_status_serialises_lowercase() {
    let json = serde_json::to_string(&MasteryStatus::Mastered).unwrap();
    assert_eq!(json, "\"mastered\"");
    assert_eq!(MasteryStatus::default(), MasteryStatus::Learning);
  }
}
