//! Workflow engine.
//!
//! The `WorkflowEngine` is the only writer of submission state. It is shared
//! by every session and holds no per-session data.

use std::sync::Arc;

use formflow_store::{Store, Submission};
use tracing::{info, instrument, warn};

use crate::decision::{Decision, next_update};
use crate::error::WorkflowError;

/// The submission lifecycle engine.
pub struct WorkflowEngine {
  store: Arc<dyn Store>,
}

impl WorkflowEngine {
  /// Create a new engine over the given store.
  pub fn new(store: Arc<dyn Store>) -> Self {
    Self { store }
  }

  /// Submit a filled form. The new submission starts out `WAITING`.
  #[instrument(skip(self, form_bytes), fields(size = form_bytes.len()))]
  pub async fn submit(
    &self,
    form_bytes: &[u8],
    form_name: &str,
    owner: Option<&str>,
  ) -> Result<i64, WorkflowError> {
    let id = self.store.insert(form_bytes, form_name, owner).await?;
    info!(id, "form submitted");
    Ok(id)
  }

  /// Approve a waiting submission.
  pub async fn approve(&self, submission: &mut Submission) -> Result<(), WorkflowError> {
    self.decide(submission, Decision::Approve).await
  }

  /// Reject a waiting submission.
  pub async fn reject(&self, submission: &mut Submission) -> Result<(), WorkflowError> {
    self.decide(submission, Decision::Reject).await
  }

  /// Apply a decision and persist it.
  ///
  /// `submission` is only modified once the store accepted the change.
  #[instrument(skip(self, submission), fields(id = submission.id))]
  pub async fn decide(
    &self,
    submission: &mut Submission,
    decision: Decision,
  ) -> Result<(), WorkflowError> {
    let Some(state) = decision.apply(submission.state) else {
      warn!(from = %submission.state, %decision, "rejected transition on resolved submission");
      return Err(WorkflowError::InvalidTransition {
        id: submission.id,
        from: submission.state,
        decision,
      });
    };

    let mut resolved = submission.clone();
    resolved.state = state;
    resolved.last_update = next_update(submission.last_update);
    self.store.update(&resolved).await?;

    info!(state = %resolved.state, "submission resolved");
    *submission = resolved;
    Ok(())
  }

  /// Every submission still waiting for a decision, ordered by id.
  pub async fn list_pending(&self) -> Result<Vec<Submission>, WorkflowError> {
    let mut all = self.store.query_all().await?;
    all.retain(Submission::is_waiting);
    Ok(all)
  }
}
