#![allow(dead_code)]

use boatme_scheduler::{
    api::router::create_router,
    domain::models::job::EmailJob,
    config::Config,
    domain::models::booking::BookingDetails,
    domain::ports::{EmailMessage, EmailService, JobStore},
    domain::services::clock::ManualClock,
    error::AppError,
    infra::factory::{build_state, connect_sqlite},
    infra::repositories::memory_job_store::MemoryJobStore,
    state::AppState,
};
use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Records every message and fails for recipients registered with `fail_for`.
#[derive(Default)]
pub struct RecordingEmailService {
    sent: Mutex<Vec<EmailMessage>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingEmailService {
    pub fn fail_for(&self, recipient: &str) {
        self.failing.lock().unwrap().insert(recipient.to_string());
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, recipient: &str) -> usize {
        self.sent.lock().unwrap().iter().filter(|m| m.recipient == recipient).count()
    }
}

#[async_trait]
impl EmailService for RecordingEmailService {
    async fn send(&self, message: &EmailMessage) -> Result<(), AppError> {
        if self.failing.lock().unwrap().contains(&message.recipient) {
            return Err(AppError::EmailDelivery(format!("mailbox unavailable: {}", message.recipient)));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Memory store whose `load` and `save` can be switched to fail.
#[derive(Default)]
pub struct FailingJobStore {
    inner: MemoryJobStore,
    fail_load: AtomicBool,
    fail_save: AtomicBool,
}

impl FailingJobStore {
    pub fn fail_load(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    pub fn fail_save(&self, fail: bool) {
        self.fail_save.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl JobStore for FailingJobStore {
    async fn load(&self) -> Result<Vec<EmailJob>, AppError> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(AppError::InternalWithMsg("store offline".to_string()));
        }
        self.inner.load().await
    }

    async fn save(&self, jobs: &[EmailJob]) -> Result<(), AppError> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(AppError::InternalWithMsg("store offline".to_string()));
        }
        self.inner.save(jobs).await
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        mail_service_url: "http://localhost".to_string(),
        mail_service_token: "token".to_string(),
        mail_from_alias: "default".to_string(),
        mail_timeout: std::time::Duration::from_secs(5),
        frontend_url: "https://boatme.test".to_string(),
        job_slot_key: "boatme_email_jobs".to_string(),
        sweep_interval: std::time::Duration::from_secs(15 * 60),
        retention_days: 30,
    }
}

pub fn booking(booking_id: &str, email: &str, end_date: DateTime<Utc>) -> BookingDetails {
    BookingDetails {
        booking_id: booking_id.to_string(),
        boat_name: "Blue Heron".to_string(),
        customer_name: "Sam Sailor".to_string(),
        customer_email: email.to_string(),
        start_date: end_date - Duration::days(3),
        end_date,
        location: Some("Marina Kaštela".to_string()),
        total_price: Some(1200),
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub store: Arc<MemoryJobStore>,
    pub clock: Arc<ManualClock>,
    pub email: Arc<RecordingEmailService>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryJobStore::new()))
    }

    pub fn with_store(store: Arc<MemoryJobStore>) -> Self {
        let clock = Arc::new(ManualClock::new(start_time()));
        let email = Arc::new(RecordingEmailService::default());

        let state = Arc::new(
            build_state(&test_config(), store.clone(), email.clone(), clock.clone())
                .expect("Failed to build test state"),
        );
        let router = create_router(state.clone());

        Self {
            router,
            state,
            store,
            clock,
            email,
        }
    }
}

/// Services over any store, with a manual clock at `start_time()`.
pub fn state_with(config: &Config, store: Arc<dyn JobStore>) -> (Arc<AppState>, Arc<ManualClock>, Arc<RecordingEmailService>) {
    let clock = Arc::new(ManualClock::new(start_time()));
    let email = Arc::new(RecordingEmailService::default());
    let state = build_state(config, store, email.clone(), clock.clone())
        .expect("Failed to build test state");
    (Arc::new(state), clock, email)
}

/// Throwaway SQLite database file, removed on drop.
pub struct TestDb {
    pub pool: SqlitePool,
    pub db_filename: String,
}

impl TestDb {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);
        let pool = connect_sqlite(&db_url).await.expect("Failed to connect to test db");
        Self { pool, db_filename }
    }

    pub fn state_with(&self, store: Arc<dyn JobStore>) -> (Arc<AppState>, Arc<RecordingEmailService>) {
        let email = Arc::new(RecordingEmailService::default());
        let clock = Arc::new(ManualClock::new(start_time()));
        let state = build_state(&test_config(), store, email.clone(), clock)
            .expect("Failed to build test state");
        (Arc::new(state), email)
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
