use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============= API Request/Response Types =============

/// Body of `POST /process-message`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QueryRequest {
    /// The customer's question, in natural language.
    pub query: String,
}

impl QueryRequest {
    /// Reject blank questions before they reach the query service.
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Field 'query' must be a non-empty string".to_string(),
            ));
        }
        Ok(())
    }
}

/// Body of a successful `POST /process-message`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QueryResponse {
    pub reply: String,
}

/// Error body shared by every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` once the knowledge index is built, `loading` before.
    pub status: String,
    pub ready: bool,
    /// Number of indexed chunks, once ready.
    pub chunks: Option<usize>,
}

// ============= RAG Types =============

/// A bounded slice of the knowledge document, the unit of retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position in the chunk sequence.
    pub index: usize,
    /// Byte offset of `content` in the source document.
    pub offset: usize,
    pub content: String,
}

/// A chunk returned by similarity search, best match first.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub index: usize,
    pub content: String,
    pub score: f32,
}

// ============= Error Types =============

/// Detail returned to clients for any failure inside the pipeline.
pub const GENERIC_FAILURE_DETAIL: &str = "An error occurred while processing your request.";

/// Detail returned while the knowledge index is still being built.
pub const NOT_READY_DETAIL: &str = "Knowledge base not loaded yet. Please try again in a moment.";

/// Seconds a client should wait before retrying a 503.
pub const RETRY_AFTER_SECS: u64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Knowledge base not loaded yet")]
    NotReady,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for failures of an external collaborator (embedding, index, generation).
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            AppError::Embedding(_) | AppError::VectorStore(_) | AppError::LLM(_)
        )
    }

    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;

        match self {
            AppError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Configuration(_)
            | AppError::Embedding(_)
            | AppError::VectorStore(_)
            | AppError::LLM(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        // Only input errors echo their message; everything else is logged
        // where it happened and reported generically.
        let detail = match &self {
            AppError::NotReady => NOT_READY_DETAIL.to_string(),
            AppError::InvalidInput(msg) | AppError::PayloadTooLarge(msg) => msg.clone(),
            _ => GENERIC_FAILURE_DETAIL.to_string(),
        };

        let body = axum::Json(ErrorBody { detail });

        if matches!(self, AppError::NotReady) {
            let retry_after = [(
                axum::http::header::RETRY_AFTER,
                RETRY_AFTER_SECS.to_string(),
            )];
            return (status, retry_after, body).into_response();
        }

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
