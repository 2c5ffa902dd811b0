use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{Error, Store, Submission, SubmissionState};

/// SQLite-based store implementation.
///
/// Every call checks a connection out of the pool for its own duration only.
/// Calls are serialized through an internal lock, so two sessions never
/// interleave their effects on the same record.
pub struct SqliteStore {
  pool: SqlitePool,
  gate: Mutex<()>,
}

impl SqliteStore {
  /// Create a new SQLite store with the given connection pool.
  pub fn new(pool: SqlitePool) -> Self {
    Self {
      pool,
      gate: Mutex::new(()),
    }
  }

  /// Open (or create) a database file.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
    let options = SqliteConnectOptions::new()
      .filename(path.as_ref())
      .create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    Ok(Self::new(pool))
  }

  /// Run database migrations.
  ///
  /// Safe to call on every start; applied migrations are skipped.
  pub async fn migrate(&self) -> Result<(), Error> {
    sqlx::migrate!("../../migrations").run(&self.pool).await?;
    Ok(())
  }

  /// Close the underlying pool.
  pub async fn close(&self) {
    self.pool.close().await;
  }
}

#[async_trait]
impl Store for SqliteStore {
  async fn insert(
    &self,
    form_bytes: &[u8],
    form_name: &str,
    owner: Option<&str>,
  ) -> Result<i64, Error> {
    let _guard = self.gate.lock().await;
    let mut conn = self.pool.acquire().await?;

    let result = sqlx::query(
      r#"
            INSERT INTO submissions (form, formName, owner, state, lastUpdate)
            VALUES (?, ?, ?, ?, ?)
            "#,
    )
    .bind(form_bytes)
    .bind(form_name)
    .bind(owner)
    .bind(SubmissionState::Waiting)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    let id = result.last_insert_rowid();
    debug!(id, form_name, "inserted submission");
    Ok(id)
  }

  async fn get(&self, id: i64) -> Result<Submission, Error> {
    let _guard = self.gate.lock().await;
    let mut conn = self.pool.acquire().await?;

    sqlx::query_as(
      r#"
            SELECT id, form, formName, owner, state, lastUpdate
            FROM submissions
            WHERE id = ?
            "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(Error::NotFound(id))
  }

  async fn update(&self, submission: &Submission) -> Result<(), Error> {
    let _guard = self.gate.lock().await;
    let mut conn = self.pool.acquire().await?;

    let result = sqlx::query(
      r#"
            UPDATE submissions
            SET state = ?, lastUpdate = ?
            WHERE id = ?
            "#,
    )
    .bind(submission.state)
    .bind(submission.last_update)
    .bind(submission.id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
      return Err(Error::NotFound(submission.id));
    }

    debug!(id = submission.id, state = %submission.state, "updated submission");
    Ok(())
  }

  async fn query_all(&self) -> Result<Vec<Submission>, Error> {
    let _guard = self.gate.lock().await;
    let mut conn = self.pool.acquire().await?;

    let submissions = sqlx::query_as(
      r#"
            SELECT id, form, formName, owner, state, lastUpdate
            FROM submissions
            ORDER BY id ASC
            "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(submissions)
  }
}
