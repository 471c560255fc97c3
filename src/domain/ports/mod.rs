use crate::domain::models::job::EmailJob;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Holder of one serialized job list. Every write replaces the whole list.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Returns the stored jobs in insertion order. An unreadable slot value reads as empty;
    /// only backend failures are errors.
    async fn load(&self) -> Result<Vec<EmailJob>, AppError>;
    async fn save(&self, jobs: &[EmailJob]) -> Result<(), AppError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
    pub tag: String,
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), AppError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
