use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use formflow_store::SubmissionState;
use serde::{Deserialize, Serialize};

/// A supervisor's verdict on a waiting submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
  Approve,
  Reject,
}

impl Decision {
  /// State reached by applying this decision to `from`.
  ///
  /// Returns `None` when `from` is terminal.
  pub fn apply(self, from: SubmissionState) -> Option<SubmissionState> {
    match (from, self) {
      (SubmissionState::Waiting, Decision::Approve) => Some(SubmissionState::Approved),
      (SubmissionState::Waiting, Decision::Reject) => Some(SubmissionState::Rejected),
      (SubmissionState::Approved | SubmissionState::Rejected, _) => None,
    }
  }
}

impl fmt::Display for Decision {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Decision::Approve => f.write_str("approve"),
      Decision::Reject => f.write_str("reject"),
    }
  }
}

/// Timestamp for a state change made after `previous`.
///
/// Uses the current time unless the clock has not moved past `previous`
/// (coarse clocks, skew), in which case it steps one microsecond ahead so
/// `last_update` strictly increases.
pub fn next_update(previous: DateTime<Utc>) -> DateTime<Utc> {
  let now = Utc::now();
  if now > previous {
    now
  } else {
    previous + TimeDelta::microseconds(1)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_waiting_can_be_resolved_either_way() {
    assert_eq!(
      Decision::Approve.apply(SubmissionState::Waiting),
      Some(SubmissionState::Approved)
    );
    assert_eq!(
      Decision::Reject.apply(SubmissionState::Waiting),
      Some(SubmissionState::Rejected)
    );
  }

  #[test]
  fn test_terminal_states_never_move() {
    for from in [SubmissionState::Approved, SubmissionState::Rejected] {
      for decision in [Decision::Approve, Decision::Reject] {
        assert_eq!(decision.apply(from), None, "{decision} from {from}");
      }
    }
  }

  #[test]
  fn test_next_update_is_strictly_later() {
    let future = Utc::now() + TimeDelta::hours(1);
    assert!(next_update(future) > future);

    let past = Utc::now() - TimeDelta::hours(1);
    assert!(next_update(past) > past);
  }
}
