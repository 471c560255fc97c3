use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, info_span, warn, Instrument};

use crate::domain::models::job::EmailJob;
use crate::domain::ports::EmailService;
use crate::domain::services::email_templates::EmailRenderer;
use crate::domain::services::job_queue::JobQueue;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SweepReport {
    pub due: usize,
    pub sent: usize,
    pub failed: usize,
    pub pruned: usize,
}

enum Outcome {
    Sent(DateTime<Utc>),
    Failed(String),
}

/// Delivers due jobs. Each due job gets exactly one attempt; failures are final.
pub struct JobProcessor {
    queue: Arc<JobQueue>,
    email_service: Arc<dyn EmailService>,
    renderer: Arc<EmailRenderer>,
    retention: Duration,
    sweep_lock: Mutex<()>,
}

impl JobProcessor {
    pub fn new(
        queue: Arc<JobQueue>,
        email_service: Arc<dyn EmailService>,
        renderer: Arc<EmailRenderer>,
        retention: Duration,
    ) -> Self {
        Self {
            queue,
            email_service,
            renderer,
            retention,
            sweep_lock: Mutex::new(()),
        }
    }

    pub async fn sweep(&self) -> SweepReport {
        let _running = self.sweep_lock.lock().await;
        let now = self.queue.now();
        // None once retention reaches past the earliest representable instant; nothing prunes then.
        let cutoff = now.checked_sub_signed(self.retention);
        let expired = |job: &EmailJob| job.status.is_terminal() && cutoff.is_some_and(|c| job.created_at < c);

        let jobs = match self.queue.snapshot().await {
            Ok(jobs) => jobs,
            Err(e) => {
                error!("Failed to load email jobs: {}", e);
                return SweepReport::default();
            }
        };

        // Store order, not fire-time order.
        let due: Vec<EmailJob> = jobs.iter().filter(|j| j.is_due(now)).cloned().collect();
        let prunable = jobs.iter().any(expired);
        let mut report = SweepReport { due: due.len(), ..SweepReport::default() };

        if due.is_empty() && !prunable {
            return report;
        }
        info!("Processing {} due email jobs", due.len());

        let mut outcomes = HashMap::with_capacity(due.len());
        for job in &due {
            let span = info_span!("email_job", job_id = %job.id, job_kind = job.kind.name());
            let outcome = async {
                match self.deliver(job).await {
                    Ok(()) => {
                        info!("Email job delivered");
                        Outcome::Sent(self.queue.now())
                    }
                    Err(e) => {
                        error!("Email job failed with error: {}", e);
                        Outcome::Failed(e.to_string())
                    }
                }
            }
                .instrument(span)
                .await;
            outcomes.insert(job.id.clone(), outcome);
        }

        // Merge into a fresh copy so jobs added or cancelled during delivery survive.
        let merged = self.queue.update(|jobs| {
            let (mut sent, mut failed) = (0usize, 0usize);
            for job in jobs.iter_mut() {
                match outcomes.remove(&job.id) {
                    Some(Outcome::Sent(at)) => {
                        if job.mark_sent(at) {
                            sent += 1;
                        } else {
                            warn!(job_id = %job.id, status = %job.status, "Email job was delivered but its status changed during delivery");
                        }
                    }
                    Some(Outcome::Failed(msg)) => {
                        if job.mark_failed(msg) {
                            failed += 1;
                        } else {
                            warn!(job_id = %job.id, status = %job.status, "Email job failed but its status changed during delivery");
                        }
                    }
                    None => {}
                }
            }
            for id in outcomes.keys() {
                warn!(job_id = %id, "Email job was removed while it was being delivered");
            }

            let before = jobs.len();
            jobs.retain(|j| !expired(j));
            (sent, failed, before - jobs.len())
        }).await;

        match merged {
            Ok((sent, failed, pruned)) => {
                report.sent = sent;
                report.failed = failed;
                report.pruned = pruned;
                info!(due = report.due, sent, failed, pruned, "Email sweep finished");
            }
            Err(e) => error!("Failed to record email job results: {}", e),
        }

        report
    }

    async fn deliver(&self, job: &EmailJob) -> Result<(), AppError> {
        let message = self.renderer.render(job)?;
        self.email_service.send(&message).await
    }
}
