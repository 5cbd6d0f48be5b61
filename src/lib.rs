//! # SupportBot - knowledge-grounded customer support server
//!
//! Loads one knowledge document at startup, indexes it with hosted
//! embeddings, and answers questions on `POST /process-message` by retrieving
//! the most relevant passages and asking a hosted LLM to answer from them only.
//!
//! ## Overview
//!
//! SupportBot can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `supportbot-server` binary
//! 2. **As a library** - Wire [`QueryService`] with your own collaborators
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use supportbot::{
//!     AppState, GeminiClient, GeminiEmbedder, GeminiTransport, KnowledgeDocument,
//!     QueryService, SupportBotConfig,
//! };
//!
//! let config = SupportBotConfig::load_or_default("supportbot.toml")?;
//! config.validate()?;
//!
//! let transport = GeminiTransport::from_config(&config)?;
//! let service = QueryService::from_config(
//!     &config,
//!     Arc::new(GeminiEmbedder::from_config(transport.clone(), &config)),
//!     Arc::new(GeminiClient::from_config(transport, &config)),
//! )?;
//!
//! let document = KnowledgeDocument::load(&config.knowledge.path).await?;
//! service.build_index(&document).await?;
//! let reply = service.answer("When are you open?").await?;
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST handlers, routes and middleware
//! - [`cli`] - command-line parsing and output
//! - [`llm`] - LLM client trait and the Gemini bindings
//! - [`rag`] - knowledge loading, chunking, embeddings, index, prompt
//! - [`service`] - query orchestration and readiness
//! - [`types`] - request/response types and error handling
//! - [`utils`] - TOML configuration

/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface.
pub mod cli;
/// LLM client implementations.
pub mod llm;
/// Retrieval pipeline components.
pub mod rag;
/// Query orchestration.
pub mod service;
/// Common types and error handling.
pub mod types;
/// Configuration.
pub mod utils;

pub use llm::{GeminiClient, GeminiTransport, LLMClient};
pub use rag::embeddings::{EmbeddingProvider, GeminiEmbedder};
pub use rag::knowledge::KnowledgeDocument;
pub use service::{IndexSummary, QueryService, ServiceState};
pub use types::{AppError, Result};
pub use utils::toml_config::SupportBotConfig;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Validated configuration
    pub config: Arc<SupportBotConfig>,
    /// Answers queries once the knowledge index is built
    pub query_service: Arc<QueryService>,
}

impl AppState {
    pub fn new(config: Arc<SupportBotConfig>, query_service: Arc<QueryService>) -> Self {
        Self {
            config,
            query_service,
        }
    }
}
