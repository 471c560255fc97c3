use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Snapshot of a boat rental booking, captured when a job is scheduled.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BookingDetails {
    pub booking_id: String,
    pub boat_name: String,
    pub customer_name: String,
    pub customer_email: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub total_price: Option<i32>,
}
