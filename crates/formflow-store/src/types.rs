use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle state of a submission.
///
/// Stored as upper-case text. `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionState {
  Waiting,
  Approved,
  Rejected,
}

impl SubmissionState {
  /// Whether no further transition is permitted from this state.
  pub fn is_terminal(self) -> bool {
    !matches!(self, SubmissionState::Waiting)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      SubmissionState::Waiting => "WAITING",
      SubmissionState::Approved => "APPROVED",
      SubmissionState::Rejected => "REJECTED",
    }
  }
}

impl fmt::Display for SubmissionState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Returned when parsing an unknown state name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown submission state: {0}")]
pub struct ParseStateError(String);

impl FromStr for SubmissionState {
  type Err = ParseStateError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_uppercase().as_str() {
      "WAITING" => Ok(SubmissionState::Waiting),
      "APPROVED" => Ok(SubmissionState::Approved),
      "REJECTED" => Ok(SubmissionState::Rejected),
      _ => Err(ParseStateError(s.to_string())),
    }
  }
}

/// A filled form as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Submission {
  pub id: i64,
  #[sqlx(rename = "form")]
  #[serde(skip)]
  pub form_bytes: Vec<u8>,
  #[sqlx(rename = "formName")]
  pub form_name: String,
  pub owner: Option<String>,
  pub state: SubmissionState,
  #[sqlx(rename = "lastUpdate")]
  pub last_update: DateTime<Utc>,
}

impl Submission {
  pub fn is_waiting(&self) -> bool {
    self.state == SubmissionState::Waiting
  }
}
