use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::background::Scheduler;
use crate::config::Config;
use crate::domain::ports::{Clock, EmailService, JobStore};
use crate::domain::services::{
    clock::SystemClock, email_templates::EmailRenderer, job_processor::JobProcessor,
    job_producer::JobProducer, job_queue::JobQueue, job_reader::JobReader,
};
use crate::error::AppError;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    postgres_job_store::PostgresJobStore, sqlite_job_store::SqliteJobStore,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
        config.mail_from_alias.clone(),
        config.mail_timeout,
    )?);

    let store: Arc<dyn JobStore> = if config.database_url.starts_with("postgres://") || config.database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");
        let pool = connect_postgres(&config.database_url).await?;
        Arc::new(PostgresJobStore::new(pool, config.job_slot_key.clone()))
    } else {
        info!("Initializing SQLite connection with WAL Mode...");
        let pool = connect_sqlite(&config.database_url).await?;
        Arc::new(SqliteJobStore::new(pool, config.job_slot_key.clone()))
    };

    build_state(config, store, email_service, Arc::new(SystemClock))
}

/// Wires the services around an already constructed store, email service and clock.
pub fn build_state(
    config: &Config,
    store: Arc<dyn JobStore>,
    email_service: Arc<dyn EmailService>,
    clock: Arc<dyn Clock>,
) -> Result<AppState, AppError> {
    let renderer = Arc::new(EmailRenderer::new(&config.frontend_url)?);
    let queue = Arc::new(JobQueue::new(store, clock));
    let processor = Arc::new(JobProcessor::new(
        queue.clone(),
        email_service,
        renderer,
        chrono::Duration::try_days(config.retention_days.into()).unwrap_or(chrono::Duration::MAX),
    ));

    Ok(AppState {
        config: config.clone(),
        producer: Arc::new(JobProducer::new(queue.clone())),
        reader: Arc::new(JobReader::new(queue)),
        scheduler: Arc::new(Scheduler::new(processor.clone(), config.sweep_interval)),
        processor,
    })
}

pub async fn connect_sqlite(database_url: &str) -> Result<SqlitePool, AppError> {
    let opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await?;

    sqlx::migrate!("./migrations/sqlite")
        .run(&pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to run SQLite migrations: {}", e)))?;

    Ok(pool)
}

pub async fn connect_postgres(database_url: &str) -> Result<PgPool, AppError> {
    let opts = PgConnectOptions::from_str(database_url)?
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_with(opts)
        .await?;

    sqlx::migrate!("./migrations/postgres")
        .run(&pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to run Postgres migrations: {}", e)))?;

    Ok(pool)
}
