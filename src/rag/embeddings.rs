//! Embedding providers.
//!
//! Documents and queries are embedded with different task types so the hosted
//! model can tune each side of the retrieval pair. Both sides must come from
//! the same model or similarity scores are meaningless.

use crate::llm::gemini::{
    BatchEmbedContentsRequest, BatchEmbedContentsResponse, Content, EmbedContentRequest,
    EmbedContentResponse, GeminiTransport, model_resource,
};
use crate::types::{AppError, Result};
use crate::utils::toml_config::SupportBotConfig;
use async_trait::async_trait;

const TASK_RETRIEVAL_DOCUMENT: &str = "RETRIEVAL_DOCUMENT";
const TASK_RETRIEVAL_QUERY: &str = "RETRIEVAL_QUERY";

/// Largest batch `batchEmbedContents` accepts.
pub const MAX_EMBEDDING_BATCH: usize = 100;

/// Maps text to fixed-dimension vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed knowledge chunks, one vector per input in input order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single user question.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    fn model_name(&self) -> &str;
}

/// Gemini `text-embedding` models over REST.
pub struct GeminiEmbedder {
    transport: GeminiTransport,
    model: String,
    batch_size: usize,
}

impl GeminiEmbedder {
    pub fn new(transport: GeminiTransport, model: String, batch_size: usize) -> Self {
        Self {
            transport,
            model,
            batch_size: batch_size.clamp(1, MAX_EMBEDDING_BATCH),
        }
    }

    pub fn from_config(transport: GeminiTransport, config: &SupportBotConfig) -> Self {
        Self::new(
            transport,
            config.rag.embedding_model.clone(),
            config.rag.embedding_batch_size,
        )
    }

    fn request(&self, text: &str, task_type: &'static str) -> EmbedContentRequest {
        EmbedContentRequest {
            model: model_resource(&self.model),
            content: Content::text(None, text),
            task_type: Some(task_type),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            let request = BatchEmbedContentsRequest {
                requests: batch
                    .iter()
                    .map(|text| self.request(text, TASK_RETRIEVAL_DOCUMENT))
                    .collect(),
            };

            let response: BatchEmbedContentsResponse = self
                .transport
                .call(&self.model, "batchEmbedContents", &request)
                .await
                .map_err(|e| AppError::Embedding(e.to_string()))?;

            if response.embeddings.len() != batch.len() {
                return Err(AppError::Embedding(format!(
                    "expected {} embeddings, provider returned {}",
                    batch.len(),
                    response.embeddings.len()
                )));
            }

            tracing::debug!(batch = batch.len(), "Embedded document batch");
            vectors.extend(response.embeddings.into_iter().map(|e| e.values));
        }

        check_dimensions(&vectors)?;
        Ok(vectors)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let request = self.request(text, TASK_RETRIEVAL_QUERY);

        let response: EmbedContentResponse = self
            .transport
            .call(&self.model, "embedContent", &request)
            .await
            .map_err(|e| AppError::Embedding(e.to_string()))?;

        if response.embedding.values.is_empty() {
            return Err(AppError::Embedding(
                "provider returned an empty query embedding".to_string(),
            ));
        }

        Ok(response.embedding.values)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// All vectors non-empty and of one dimension.
fn check_dimensions(vectors: &[Vec<f32>]) -> Result<()> {
    let Some(first) = vectors.first() else {
        return Ok(());
    };
    let dims = first.len();
    if dims == 0 {
        return Err(AppError::Embedding(
            "provider returned an empty embedding".to_string(),
        ));
    }
    if let Some((i, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dims) {
        return Err(AppError::Embedding(format!(
            "embedding {} has {} dimensions, expected {}",
            i,
            v.len(),
            dims
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_size_is_clamped() {
        let transport = GeminiTransport::new("k".into(), "http://localhost".into(), None).unwrap();
        let embedder = GeminiEmbedder::new(transport.clone(), "text-embedding-004".into(), 500);
        assert_eq!(embedder.batch_size, MAX_EMBEDDING_BATCH);

        let embedder = GeminiEmbedder::new(transport, "text-embedding-004".into(), 0);
        assert_eq!(embedder.batch_size, 1);
    }

    #[test]
    fn test_check_dimensions() {
        assert!(check_dimensions(&[]).is_ok());
        assert!(check_dimensions(&[vec![0.1, 0.2], vec![0.3, 0.4]]).is_ok());
        assert!(matches!(
            check_dimensions(&[vec![0.1, 0.2], vec![0.3]]),
            Err(AppError::Embedding(_))
        ));
        assert!(matches!(
            check_dimensions(&[vec![]]),
            Err(AppError::Embedding(_))
        ));
    }
}
