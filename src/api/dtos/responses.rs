use serde::Serialize;

#[derive(Serialize)]
pub struct CancelJobResponse {
    pub cancelled: bool,
}

#[derive(Serialize)]
pub struct CancelBookingJobsResponse {
    pub cancelled: usize,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub scheduler_running: bool,
}
