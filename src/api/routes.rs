use crate::AppState;
use crate::api::handlers::{health, message};
use crate::api::openapi::ApiDoc;
use axum::{
    Json, Router,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/process-message", post(message::process_message))
        .route("/health", get(health::health_check))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
}

/// Any origin, method and header, with credentials.
///
/// Wildcards are not allowed together with credentials, so the request's own
/// values are mirrored back instead.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .expose_headers([axum::http::header::RETRY_AFTER])
}

/// The full application: routes, middleware and state.
pub fn build_app(state: AppState) -> Router {
    let max_body_bytes = state.config.server.max_body_bytes;

    // Each layer wraps the previous one, so CORS headers also reach 413s
    create_router()
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
