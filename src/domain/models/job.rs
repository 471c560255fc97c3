use std::fmt;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::domain::models::booking::BookingDetails;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Sent,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Sent => "sent",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DocumentFollowup {
    pub recipient_name: String,
}

/// What a job sends, with the data needed to render it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum JobKind {
    BookingReminder(BookingDetails),
    DocumentFollowup(DocumentFollowup),
    ReviewReminder(BookingDetails),
}

impl JobKind {
    pub fn name(&self) -> &'static str {
        match self {
            JobKind::BookingReminder(_) => "booking_reminder",
            JobKind::DocumentFollowup(_) => "document_followup",
            JobKind::ReviewReminder(_) => "review_reminder",
        }
    }

    pub fn booking_id(&self) -> Option<&str> {
        match self {
            JobKind::BookingReminder(b) | JobKind::ReviewReminder(b) => Some(&b.booking_id),
            JobKind::DocumentFollowup(_) => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EmailJob {
    pub id: String,
    pub kind: JobKind,
    pub recipient: String,
    pub fires_at: DateTime<Utc>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl EmailJob {
    pub fn new(kind: JobKind, recipient: String, fires_at: DateTime<Utc>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            recipient,
            fires_at,
            status: JobStatus::Pending,
            created_at,
            sent_at: None,
            error_message: None,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == JobStatus::Pending && self.fires_at <= now
    }

    // Transitions only apply to pending jobs; a terminal status never changes again.

    pub fn mark_sent(&mut self, at: DateTime<Utc>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::Sent;
        self.sent_at = Some(at);
        true
    }

    pub fn mark_failed(&mut self, error_message: String) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::Failed;
        self.error_message = Some(error_message);
        true
    }

    pub fn cancel(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::Cancelled;
        true
    }
}

/// Parses a stored slot value. Missing, invalid or differently shaped values read as an empty queue.
pub fn decode_jobs(raw: Option<&str>) -> Vec<EmailJob> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<EmailJob>>(raw) {
        Ok(jobs) => jobs,
        Err(e) => {
            warn!("Stored job list is unreadable, treating as empty: {}", e);
            Vec::new()
        }
    }
}

pub fn encode_jobs(jobs: &[EmailJob]) -> Result<String, AppError> {
    Ok(serde_json::to_string(jobs)?)
}
