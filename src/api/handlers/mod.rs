/// Service health and readiness.
pub mod health;
/// The question answering endpoint.
pub mod message;
