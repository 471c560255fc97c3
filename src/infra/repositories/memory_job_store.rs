use crate::domain::{models::job::{decode_jobs, encode_jobs, EmailJob}, ports::JobStore};
use crate::error::AppError;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Slot held in process memory. Stores the serialized form so it behaves like the persistent stores.
pub struct MemoryJobStore {
    slot: RwLock<Option<String>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self { slot: RwLock::new(None) }
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self { slot: RwLock::new(Some(raw.into())) }
    }

    pub async fn raw(&self) -> Option<String> {
        self.slot.read().await.clone()
    }
}

impl Default for MemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn load(&self) -> Result<Vec<EmailJob>, AppError> {
        Ok(decode_jobs(self.slot.read().await.as_deref()))
    }

    async fn save(&self, jobs: &[EmailJob]) -> Result<(), AppError> {
        let value = encode_jobs(jobs)?;
        *self.slot.write().await = Some(value);
        Ok(())
    }
}
