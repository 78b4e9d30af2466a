//! The result of a single review attempt, validated at the boundary.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
  Correct,
  Incorrect,
}

impl Outcome {
  pub fn is_correct(self) -> bool { matches!(self, Self::Correct) }

  /// Accept a raw JSON value as an outcome. Only `true` and `false` are
  /// valid; `"true"`, `1` and `null` are all rejected.
  pub fn from_json(value: &serde_json::Value) -> Result<Self> {
    match value {
      serde_json::Value::Bool(b) => Ok(Self::from(*b)),
      other => Err(Error::InvalidOutcome(format!(
        "expected a boolean, got {other}"
      ))),
    }
  }
}

impl From<bool> for Outcome {
  fn from(was_correct: bool) -> Self {
    if was_correct { Self::Correct } else { Self::Incorrect }
  }
}
