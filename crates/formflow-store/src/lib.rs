//! Formflow Store
//!
//! This crate provides the storage trait and implementation for form
//! submissions. Data is persisted to a SQLite database.
//!
//! The [`Store`] trait defines operations for:
//! - Inserting a newly submitted form (always in the `WAITING` state)
//! - Persisting a state change made by the workflow engine
//! - Reading every submission in insertion order
//!
//! Each operation is individually atomic. There are no multi-operation
//! transactions; callers must not assume partial success on failure.

mod sqlite;
mod types;

pub use sqlite::SqliteStore;
pub use types::{ParseStateError, Submission, SubmissionState};

use async_trait::async_trait;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The requested submission was not found.
  #[error("submission not found: {0}")]
  NotFound(i64),

  /// A database error occurred.
  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),

  /// Applying the schema failed.
  #[error("migration error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Storage trait for submissions.
///
/// Implementations must be safe to share between concurrently running
/// sessions.
#[async_trait]
pub trait Store: Send + Sync {
  /// Insert a new submission in the `WAITING` state and return its id.
  async fn insert(
    &self,
    form_bytes: &[u8],
    form_name: &str,
    owner: Option<&str>,
  ) -> Result<i64, Error>;

  /// Get a submission by id.
  async fn get(&self, id: i64) -> Result<Submission, Error>;

  /// Persist the state and last update time of an existing submission.
  ///
  /// The form bytes are never written.
  async fn update(&self, submission: &Submission) -> Result<(), Error>;

  /// List every submission, ordered by id.
  async fn query_all(&self) -> Result<Vec<Submission>, Error>;
}
