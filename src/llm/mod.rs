//! LLM Provider Clients and Abstractions
//!
//! - [`LLMClient`] - the trait the query service generates answers through
//! - [`gemini`] - Google Gemini REST bindings (generation and the shared
//!   HTTP transport also used for embeddings)

/// Core LLM client trait.
pub mod client;
/// Google Gemini REST API client.
pub mod gemini;

pub use client::LLMClient;
pub use gemini::{GeminiClient, GeminiTransport};
