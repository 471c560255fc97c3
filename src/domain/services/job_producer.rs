use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info};

use crate::domain::models::booking::BookingDetails;
use crate::domain::models::job::{DocumentFollowup, EmailJob, JobKind, JobStatus};
use crate::domain::services::job_queue::JobQueue;

/// Review requests go out one day after the rental ends.
pub const REVIEW_REMINDER_DELAY_HOURS: i64 = 24;

pub fn review_reminder_fire_time(booking: &BookingDetails) -> DateTime<Utc> {
    booking.end_date + Duration::hours(REVIEW_REMINDER_DELAY_HOURS)
}

/// Appends jobs to the queue. Store failures are logged and reported as `None`.
pub struct JobProducer {
    queue: Arc<JobQueue>,
}

impl JobProducer {
    pub fn new(queue: Arc<JobQueue>) -> Self {
        Self { queue }
    }

    pub async fn schedule_booking_reminder(&self, booking: BookingDetails, fires_at: DateTime<Utc>) -> Option<EmailJob> {
        let recipient = booking.customer_email.clone();
        self.enqueue(JobKind::BookingReminder(booking), recipient, fires_at).await
    }

    pub async fn schedule_document_followup(&self, recipient: &str, name: &str, fires_at: DateTime<Utc>) -> Option<EmailJob> {
        let kind = JobKind::DocumentFollowup(DocumentFollowup { recipient_name: name.to_string() });
        self.enqueue(kind, recipient.to_string(), fires_at).await
    }

    /// Schedules the review request for `booking`. A booking keeps at most one pending
    /// review reminder; scheduling again returns the existing one.
    pub async fn schedule_review_reminder(&self, booking: BookingDetails) -> Option<EmailJob> {
        let fires_at = review_reminder_fire_time(&booking);
        let booking_id = booking.booking_id.clone();
        let created_at = self.queue.now();
        let job = EmailJob::new(
            JobKind::ReviewReminder(booking.clone()),
            booking.customer_email,
            fires_at,
            created_at,
        );

        let result = self.queue.update(|jobs| {
            let existing = jobs.iter().find(|j| {
                j.status == JobStatus::Pending
                    && matches!(&j.kind, JobKind::ReviewReminder(b) if b.booking_id == booking_id)
            });
            if let Some(existing) = existing {
                return existing.clone();
            }
            jobs.push(job.clone());
            job
        }).await;

        match result {
            Ok(job) => {
                info!(job_id = %job.id, booking_id = %booking_id, fires_at = %job.fires_at, "Review reminder scheduled");
                Some(job)
            }
            Err(e) => {
                error!("Failed to schedule review reminder for booking {}: {}", booking_id, e);
                None
            }
        }
    }

    async fn enqueue(&self, kind: JobKind, recipient: String, fires_at: DateTime<Utc>) -> Option<EmailJob> {
        let job = EmailJob::new(kind, recipient, fires_at, self.queue.now());
        let stored = job.clone();

        match self.queue.update(move |jobs| jobs.push(stored)).await {
            Ok(()) => {
                info!(job_id = %job.id, job_kind = job.kind.name(), fires_at = %job.fires_at, "Email job scheduled");
                Some(job)
            }
            Err(e) => {
                error!("Failed to schedule {} job: {}", job.kind.name(), e);
                None
            }
        }
    }
}
