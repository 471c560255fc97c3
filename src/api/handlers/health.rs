use axum::{extract::State, response::IntoResponse, Json};
use crate::api::dtos::responses::HealthResponse;
use crate::state::AppState;
use std::sync::Arc;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        scheduler_running: state.scheduler.is_running().await,
    })
}
