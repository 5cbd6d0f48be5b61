use crate::{
    AppState,
    types::{AppError, ErrorBody, QueryRequest, QueryResponse, Result},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

/// Answer a customer question from the knowledge base
#[utoipa::path(
    post,
    path = "/process-message",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Answer generated", body = QueryResponse),
        (status = 400, description = "Missing, malformed or empty query", body = ErrorBody),
        (status = 413, description = "Request body too large", body = ErrorBody),
        (status = 503, description = "Knowledge base still loading", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "support"
)]
pub async fn process_message(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>> {
    let Json(request) = payload.map_err(reject_body)?;
    request.validate()?;

    let reply = state.query_service.answer(&request.query).await?;

    Ok(Json(QueryResponse { reply }))
}

/// Body errors become 400, except the size limit which keeps its 413.
fn reject_body(rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection, "Rejected request body");
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(rejection.body_text())
    } else {
        AppError::InvalidInput(rejection.body_text())
    }
}
