use std::sync::Arc;

use tracing::{error, info};

use crate::domain::models::job::EmailJob;
use crate::domain::services::job_queue::JobQueue;

/// Read and cancel operations backing the operator dashboard.
pub struct JobReader {
    queue: Arc<JobQueue>,
}

impl JobReader {
    pub fn new(queue: Arc<JobQueue>) -> Self {
        Self { queue }
    }

    pub async fn list(&self, recipient: Option<&str>) -> Vec<EmailJob> {
        match self.queue.snapshot().await {
            Ok(jobs) => match recipient {
                Some(r) => jobs.into_iter().filter(|j| j.recipient == r).collect(),
                None => jobs,
            },
            Err(e) => {
                error!("Failed to list email jobs: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn get(&self, id: &str) -> Option<EmailJob> {
        self.list(None).await.into_iter().find(|j| j.id == id)
    }

    /// Removes the job. Removing an unknown id succeeds; only a store failure returns `false`.
    pub async fn cancel(&self, id: &str) -> bool {
        match self.queue.update(|jobs| {
            let before = jobs.len();
            jobs.retain(|j| j.id != id);
            before - jobs.len()
        }).await {
            Ok(removed) => {
                info!(job_id = %id, removed, "Email job cancelled");
                true
            }
            Err(e) => {
                error!("Failed to cancel email job {}: {}", id, e);
                false
            }
        }
    }

    /// Marks every pending job of the booking as cancelled and returns how many changed.
    pub async fn cancel_for_booking(&self, booking_id: &str) -> usize {
        let result = self.queue.update(|jobs| {
            jobs.iter_mut()
                .filter(|j| j.kind.booking_id() == Some(booking_id))
                .map(|j| j.cancel())
                .filter(|changed| *changed)
                .count()
        }).await;

        match result {
            Ok(count) => {
                info!(booking_id = %booking_id, count, "Pending email jobs cancelled for booking");
                count
            }
            Err(e) => {
                error!("Failed to cancel email jobs for booking {}: {}", booking_id, e);
                0
            }
        }
    }
}
