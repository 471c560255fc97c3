use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, jobs};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Operator dashboard
        .route("/api/v1/jobs", get(jobs::list_jobs))
        .route("/api/v1/jobs/sweep", post(jobs::run_sweep))
        .route("/api/v1/jobs/{job_id}", get(jobs::get_job).delete(jobs::cancel_job))
        .route("/api/v1/bookings/{booking_id}/jobs/cancel", post(jobs::cancel_booking_jobs))

        // Producers
        .route("/api/v1/jobs/booking-reminders", post(jobs::schedule_booking_reminder))
        .route("/api/v1/jobs/document-followups", post(jobs::schedule_document_followup))
        .route("/api/v1/jobs/review-reminders", post(jobs::schedule_review_reminder))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
