//! Integration tests for SqliteStore against a scratch database file.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use formflow_store::{Error, SqliteStore, Store, SubmissionState};

async fn create_test_store() -> (SqliteStore, tempfile::TempDir) {
  let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
  let store = SqliteStore::open(temp_dir.path().join("formflow.db"))
    .await
    .expect("failed to open store");
  store.migrate().await.expect("failed to migrate");
  (store, temp_dir)
}

#[tokio::test]
async fn test_insert_then_query_all_round_trips() {
  let (store, _temp_dir) = create_test_store().await;
  let bytes = vec![0x50, 0x4b, 0x03, 0x04, 0x00, 0xff];

  let before = Utc::now();
  let id = store
    .insert(&bytes, "leave.doc", Some("employee"))
    .await
    .unwrap();

  let all = store.query_all().await.unwrap();
  assert_eq!(all.len(), 1);

  let submission = &all[0];
  assert_eq!(submission.id, id);
  assert_eq!(submission.form_bytes, bytes);
  assert_eq!(submission.form_name, "leave.doc");
  assert_eq!(submission.owner.as_deref(), Some("employee"));
  assert_eq!(submission.state, SubmissionState::Waiting);
  assert!(submission.last_update >= before);
}

#[tokio::test]
async fn test_owner_is_optional() {
  let (store, _temp_dir) = create_test_store().await;

  let id = store.insert(b"x", "business_trip.xlsx", None).await.unwrap();

  let submission = store.get(id).await.unwrap();
  assert_eq!(submission.owner, None);
}

#[tokio::test]
async fn test_ids_are_monotonic_and_ordered() {
  let (store, _temp_dir) = create_test_store().await;

  let first = store.insert(b"a", "a.xlsx", None).await.unwrap();
  let second = store.insert(b"b", "b.xlsx", None).await.unwrap();
  let third = store.insert(b"c", "c.xlsx", None).await.unwrap();
  assert!(first < second && second < third);

  let ids: Vec<i64> = store
    .query_all()
    .await
    .unwrap()
    .into_iter()
    .map(|s| s.id)
    .collect();
  assert_eq!(ids, vec![first, second, third]);
}

#[tokio::test]
async fn test_update_persists_state_and_timestamp_only() {
  let (store, _temp_dir) = create_test_store().await;
  let id = store.insert(b"original", "leave.doc", None).await.unwrap();

  let mut submission = store.get(id).await.unwrap();
  submission.state = SubmissionState::Approved;
  submission.last_update += TimeDelta::seconds(5);
  submission.form_bytes = b"tampered".to_vec();
  submission.form_name = "renamed.doc".to_string();
  store.update(&submission).await.unwrap();

  let stored = store.get(id).await.unwrap();
  assert_eq!(stored.state, SubmissionState::Approved);
  assert_eq!(stored.last_update, submission.last_update);
  assert_eq!(stored.form_bytes, b"original");
  assert_eq!(stored.form_name, "leave.doc");
}

#[tokio::test]
async fn test_update_missing_record_fails() {
  let (store, _temp_dir) = create_test_store().await;
  let id = store.insert(b"x", "leave.doc", None).await.unwrap();

  let mut submission = store.get(id).await.unwrap();
  submission.id = id + 100;
  submission.state = SubmissionState::Rejected;

  let result = store.update(&submission).await;
  assert!(matches!(result, Err(Error::NotFound(missing)) if missing == id + 100));
}

#[tokio::test]
async fn test_get_missing_record_fails() {
  let (store, _temp_dir) = create_test_store().await;

  let result = store.get(42).await;
  assert!(matches!(result, Err(Error::NotFound(42))));
}

#[tokio::test]
async fn test_migrate_is_idempotent() {
  let (store, _temp_dir) = create_test_store().await;
  store.insert(b"x", "leave.doc", None).await.unwrap();

  store.migrate().await.unwrap();

  assert_eq!(store.query_all().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_are_not_lost() {
  let (store, _temp_dir) = create_test_store().await;
  let store = Arc::new(store);

  let handles: Vec<_> = (0..16)
    .map(|n| {
      let store = Arc::clone(&store);
      tokio::spawn(async move {
        let owner = format!("session-{n}");
        store
          .insert(format!("form {n}").as_bytes(), "leave.doc", Some(&owner))
          .await
      })
    })
    .collect();

  let mut ids = Vec::new();
  for handle in handles {
    ids.push(handle.await.unwrap().unwrap());
  }

  let all = store.query_all().await.unwrap();
  assert_eq!(all.len(), 16);

  ids.sort_unstable();
  ids.dedup();
  assert_eq!(ids.len(), 16);
  assert_eq!(all.iter().map(|s| s.id).collect::<Vec<_>>(), ids);
}
