use formflow_store::SubmissionState;

use crate::Decision;

/// Errors returned by workflow operations.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
  /// A decision was requested on a submission that is already resolved.
  #[error("cannot {decision} submission {id}: it is already {from}")]
  InvalidTransition {
    id: i64,
    from: SubmissionState,
    decision: Decision,
  },

  /// The store rejected or failed the operation.
  #[error(transparent)]
  Persistence(#[from] formflow_store::Error),
}
