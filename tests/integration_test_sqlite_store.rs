mod common;

use boatme_scheduler::{
    domain::models::job::JobStatus,
    domain::ports::JobStore,
    infra::repositories::sqlite_job_store::SqliteJobStore,
};
use chrono::Duration;
use common::{booking, start_time, TestDb};
use std::sync::Arc;

#[tokio::test]
async fn test_sqlite_store_round_trip() {
    let db = TestDb::new().await;
    let store = Arc::new(SqliteJobStore::new(db.pool.clone(), "boatme_email_jobs"));
    let (state, email) = db.state_with(store.clone());

    assert!(store.load().await.unwrap().is_empty());

    let reminder = state.producer
        .schedule_booking_reminder(booking("bk-1", "renter@boatme.test", start_time() + Duration::days(4)), start_time())
        .await
        .unwrap();
    let review = state.producer
        .schedule_review_reminder(booking("bk-1", "renter@boatme.test", start_time() + Duration::days(4)))
        .await
        .unwrap();

    let stored = store.load().await.unwrap();
    assert_eq!(stored, vec![reminder.clone(), review.clone()]);

    let report = state.processor.sweep().await;
    assert_eq!(report.sent, 1);
    assert_eq!(email.sent_to("renter@boatme.test"), 1);

    let stored = store.load().await.unwrap();
    assert_eq!(stored[0].status, JobStatus::Sent);
    assert_eq!(stored[1].status, JobStatus::Pending);
}

#[tokio::test]
async fn test_sqlite_slots_are_independent() {
    let db = TestDb::new().await;
    let alice = Arc::new(SqliteJobStore::new(db.pool.clone(), "jobs:alice"));
    let bob = Arc::new(SqliteJobStore::new(db.pool.clone(), "jobs:bob"));
    let (alice_state, _) = db.state_with(alice.clone());
    let (bob_state, _) = db.state_with(bob.clone());

    alice_state.producer.schedule_document_followup("alice@boatme.test", "Alice", start_time()).await.unwrap();
    bob_state.producer.schedule_document_followup("bob@boatme.test", "Bob", start_time()).await.unwrap();
    bob_state.producer.schedule_document_followup("bob@boatme.test", "Bob", start_time()).await.unwrap();

    assert_eq!(alice_state.reader.list(None).await.len(), 1);
    assert_eq!(bob_state.reader.list(None).await.len(), 2);
    assert!(alice.load().await.unwrap().iter().all(|j| j.recipient == "alice@boatme.test"));
}

#[tokio::test]
async fn test_sqlite_corrupt_value_reads_as_empty() {
    let db = TestDb::new().await;
    sqlx::query("INSERT INTO job_slots (slot_key, value, updated_at) VALUES (?, ?, ?)")
        .bind("boatme_email_jobs")
        .bind("[{\"id\": \"half-written")
        .bind(start_time())
        .execute(&db.pool)
        .await
        .unwrap();

    let store = Arc::new(SqliteJobStore::new(db.pool.clone(), "boatme_email_jobs"));
    let (state, _) = db.state_with(store.clone());

    assert!(state.reader.list(None).await.is_empty());
    assert!(state.reader.cancel("anything").await);
    assert_eq!(store.load().await.unwrap().len(), 0);
}
