use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::models::job::EmailJob;
use crate::domain::ports::{Clock, JobStore};
use crate::error::AppError;

/// Shared handle to one job slot.
///
/// Mutations are read-modify-write of the whole list. They are serialized for callers
/// sharing this handle; two handles over the same slot (or two processes) still race and
/// the last save wins.
pub struct JobQueue {
    store: Arc<dyn JobStore>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl JobQueue {
    pub fn new(store: Arc<dyn JobStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub async fn snapshot(&self) -> Result<Vec<EmailJob>, AppError> {
        self.store.load().await
    }

    pub async fn update<F, R>(&self, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut Vec<EmailJob>) -> R,
    {
        let _guard = self.write_lock.lock().await;
        let mut jobs = self.store.load().await?;
        let result = f(&mut jobs);
        self.store.save(&jobs).await?;
        Ok(result)
    }
}
