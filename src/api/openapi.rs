use crate::types::{ErrorBody, HealthResponse, QueryRequest, QueryResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SupportBot",
        description = "Answers customer questions from a single knowledge document"
    ),
    paths(
        crate::api::handlers::message::process_message,
        crate::api::handlers::health::health_check,
    ),
    components(schemas(QueryRequest, QueryResponse, ErrorBody, HealthResponse)),
    tags(
        (name = "support", description = "Question answering"),
        (name = "health", description = "Service status")
    )
)]
pub struct ApiDoc;
