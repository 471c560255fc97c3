use crate::domain::{models::job::{decode_jobs, encode_jobs, EmailJob}, ports::JobStore};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::Utc;

pub struct SqliteJobStore {
    pool: SqlitePool,
    slot_key: String,
}

impl SqliteJobStore {
    pub fn new(pool: SqlitePool, slot_key: impl Into<String>) -> Self {
        Self { pool, slot_key: slot_key.into() }
    }
}

#[async_trait]
impl JobStore for SqliteJobStore {
    async fn load(&self) -> Result<Vec<EmailJob>, AppError> {
        let raw = sqlx::query_scalar::<_, String>("SELECT value FROM job_slots WHERE slot_key = ?")
            .bind(&self.slot_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(decode_jobs(raw.as_deref()))
    }

    async fn save(&self, jobs: &[EmailJob]) -> Result<(), AppError> {
        let value = encode_jobs(jobs)?;
        sqlx::query(
            "INSERT INTO job_slots (slot_key, value, updated_at) VALUES (?, ?, ?) ON CONFLICT(slot_key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"
        )
            .bind(&self.slot_key)
            .bind(value)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
