use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{
    ListJobsQuery, ScheduleBookingReminderRequest, ScheduleDocumentFollowupRequest,
    ScheduleReviewReminderRequest,
};
use crate::api::dtos::responses::{CancelBookingJobsResponse, CancelJobResponse};
use crate::domain::models::{booking::BookingDetails, job::EmailJob};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

fn require(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn validate_booking(booking: &BookingDetails) -> Result<(), AppError> {
    require(&booking.booking_id, "booking.booking_id")?;
    require(&booking.customer_email, "booking.customer_email")?;
    if booking.end_date < booking.start_date {
        return Err(AppError::Validation("booking.end_date must not be before booking.start_date".into()));
    }
    Ok(())
}

fn created(job: Option<EmailJob>) -> Result<(StatusCode, Json<EmailJob>), AppError> {
    let job = job.ok_or_else(|| AppError::InternalWithMsg("Failed to schedule email job".into()))?;
    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListJobsQuery>,
) -> impl IntoResponse {
    Json(state.reader.list(query.recipient.as_deref()).await)
}

pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let job = state.reader.get(&job_id).await
        .ok_or(AppError::NotFound(format!("Job {} not found", job_id)))?;
    Ok(Json(job))
}

pub async fn cancel_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let cancelled = state.reader.cancel(&job_id).await;
    Json(CancelJobResponse { cancelled })
}

pub async fn cancel_booking_jobs(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> impl IntoResponse {
    let cancelled = state.reader.cancel_for_booking(&booking_id).await;
    Json(CancelBookingJobsResponse { cancelled })
}

pub async fn schedule_booking_reminder(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ScheduleBookingReminderRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_booking(&payload.booking)?;
    created(state.producer.schedule_booking_reminder(payload.booking, payload.fires_at).await)
}

pub async fn schedule_document_followup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ScheduleDocumentFollowupRequest>,
) -> Result<impl IntoResponse, AppError> {
    require(&payload.recipient, "recipient")?;
    require(&payload.name, "name")?;
    created(state.producer.schedule_document_followup(&payload.recipient, &payload.name, payload.fires_at).await)
}

pub async fn schedule_review_reminder(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ScheduleReviewReminderRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_booking(&payload.booking)?;
    created(state.producer.schedule_review_reminder(payload.booking).await)
}

pub async fn run_sweep(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    info!("Manual email sweep requested");
    Json(state.processor.sweep().await)
}
