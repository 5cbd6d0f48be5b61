//! HTTP API Handlers and Routes
//!
//! Built on Axum; every route shares [`AppState`](crate::AppState).
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and middleware
//! - [`api::openapi`](crate::api::openapi) - Generated OpenAPI document
//!
//! # API Endpoints
//!
//! - `POST /process-message` - Answer a question from the knowledge base
//! - `GET /health` - Readiness of the knowledge index
//! - `GET /openapi.json` - OpenAPI document
//!
//! # Status Codes
//!
//! | Status | When |
//! |--------|------|
//! | 200 | `{"reply": ...}` |
//! | 400 | body is not JSON, `query` is missing or blank |
//! | 503 | knowledge index still building, with `Retry-After` |
//! | 500 | any collaborator failure, with a generic `detail` |
//!
//! CORS is fully permissive: any origin, method and header, credentials allowed.

/// Request handlers for API endpoints.
pub mod handlers;
/// OpenAPI document.
pub mod openapi;
/// Route definitions and router configuration.
pub mod routes;
