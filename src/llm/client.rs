//! LLM client abstraction
//!
//! The query service only needs one capability from a language model: turn a
//! fully rendered prompt into text. Keeping that behind a trait lets tests and
//! alternative providers stand in for the hosted model.

use crate::types::Result;
use async_trait::async_trait;

/// Generic LLM client trait for provider abstraction
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}
