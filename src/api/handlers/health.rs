use crate::{AppState, types::HealthResponse};
use axum::{Json, extract::State};

/// Liveness and readiness of the knowledge index
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ready = state.query_service.is_ready();

    Json(HealthResponse {
        status: if ready { "ok" } else { "loading" }.to_string(),
        ready,
        chunks: state.query_service.indexed_chunks(),
    })
}
