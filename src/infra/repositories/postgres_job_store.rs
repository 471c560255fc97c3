use crate::domain::{models::job::{decode_jobs, encode_jobs, EmailJob}, ports::JobStore};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::Utc;

pub struct PostgresJobStore {
    pool: PgPool,
    slot_key: String,
}

impl PostgresJobStore {
    pub fn new(pool: PgPool, slot_key: impl Into<String>) -> Self {
        Self { pool, slot_key: slot_key.into() }
    }
}

#[async_trait]
impl JobStore for PostgresJobStore {
    async fn load(&self) -> Result<Vec<EmailJob>, AppError> {
        let raw = sqlx::query_scalar::<_, String>("SELECT value FROM job_slots WHERE slot_key = $1")
            .bind(&self.slot_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(decode_jobs(raw.as_deref()))
    }

    async fn save(&self, jobs: &[EmailJob]) -> Result<(), AppError> {
        let value = encode_jobs(jobs)?;
        sqlx::query(
            "INSERT INTO job_slots (slot_key, value, updated_at) VALUES ($1, $2, $3) ON CONFLICT(slot_key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"
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
