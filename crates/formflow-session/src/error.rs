//! Session error types.

use formflow_store::SubmissionState;
use formflow_workflow::WorkflowError;

use crate::catalog::CatalogError;
use crate::document::DocumentError;

/// Errors that can occur while handling a session event.
///
/// Everything except [`SessionError::EntryReload`] is recoverable: the
/// message is shown on the active view and the session keeps running.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
  /// Login was attempted with an empty role.
  #[error("enter a role to log in")]
  MissingRole,

  /// An action that needs a role arrived while logged out.
  #[error("not logged in")]
  NotLoggedIn,

  /// The selected template is not in the current listing.
  #[error("unknown template: {0}")]
  UnknownTemplate(String),

  /// The selected submission is not in the current listing.
  #[error("unknown submission: {0}")]
  UnknownSubmission(String),

  /// Only waiting submissions can be opened for review.
  #[error("submission {id} is {state}, only waiting submissions can be reviewed")]
  NotPending { id: i64, state: SubmissionState },

  /// Approve or reject arrived with nothing opened for review.
  #[error("no submission is under review")]
  NothingUnderReview,

  /// The renderer has no active document to export.
  #[error("no active document")]
  NoActiveDocument,

  /// Submit, approve, or reject failed.
  #[error(transparent)]
  Workflow(#[from] WorkflowError),

  /// A template or submission could not be rendered.
  #[error(transparent)]
  Document(#[from] DocumentError),

  /// The template catalog could not be read.
  #[error(transparent)]
  Catalog(#[from] CatalogError),

  /// The entry document could not be loaded. There is no other landing page,
  /// so the session cannot continue.
  #[error("failed to load entry document: {source}")]
  EntryReload {
    #[source]
    source: DocumentError,
  },
}

impl SessionError {
  /// Whether the session must stop.
  pub fn is_fatal(&self) -> bool {
    matches!(self, SessionError::EntryReload { .. })
  }
}
