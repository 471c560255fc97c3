use crate::domain::models::booking::BookingDetails;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct ScheduleBookingReminderRequest {
    pub booking: BookingDetails,
    pub fires_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct ScheduleDocumentFollowupRequest {
    pub recipient: String,
    pub name: String,
    pub fires_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct ScheduleReviewReminderRequest {
    pub booking: BookingDetails,
}

#[derive(Deserialize)]
pub struct ListJobsQuery {
    pub recipient: Option<String>,
}
