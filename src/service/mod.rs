//! Query orchestration.
//!
//! [`QueryService`] owns the one-way NotReady -> Ready transition. The index
//! is installed exactly once into a `OnceCell`; until then every query is
//! refused with [`AppError::NotReady`] without touching any collaborator.

use crate::llm::LLMClient;
use crate::rag::chunker::TextChunker;
use crate::rag::embeddings::EmbeddingProvider;
use crate::rag::index::KnowledgeIndex;
use crate::rag::knowledge::KnowledgeDocument;
use crate::rag::prompt::{PromptTemplate, join_context};
use crate::types::{AppError, Result};
use crate::utils::toml_config::SupportBotConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    NotReady,
    Ready,
}

/// Outcome of a successful ingestion.
#[derive(Debug, Clone)]
pub struct IndexSummary {
    pub chunks: usize,
    pub dimensions: usize,
    pub elapsed: Duration,
}

pub struct QueryService {
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn LLMClient>,
    chunker: TextChunker,
    prompt: PromptTemplate,
    top_k: usize,
    index: OnceCell<KnowledgeIndex>,
    building: AtomicBool,
}

impl QueryService {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn LLMClient>,
        chunker: TextChunker,
        prompt: PromptTemplate,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            generator,
            chunker,
            prompt,
            top_k,
            index: OnceCell::new(),
            building: AtomicBool::new(false),
        }
    }

    /// Wire the service from `[rag]` and `[prompt]` with the given collaborators.
    pub fn from_config(
        config: &SupportBotConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn LLMClient>,
    ) -> Result<Self> {
        let chunker = TextChunker::new(config.rag.chunk_size, config.rag.chunk_overlap)?;
        let prompt = config.prompt_template()?;
        Ok(Self::new(
            embedder,
            generator,
            chunker,
            prompt,
            config.rag.top_k,
        ))
    }

    pub fn state(&self) -> ServiceState {
        if self.index.initialized() {
            ServiceState::Ready
        } else {
            ServiceState::NotReady
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == ServiceState::Ready
    }

    /// Chunks in the installed index, if any.
    pub fn indexed_chunks(&self) -> Option<usize> {
        self.index.get().map(KnowledgeIndex::len)
    }

    /// Chunk, embed and index `document`, then switch to Ready.
    ///
    /// # Errors
    ///
    /// Fails with [`AppError::Internal`] if an index is already installed or
    /// another build is in flight; collaborator failures are returned as-is
    /// and leave the service NotReady.
    pub async fn build_index(&self, document: &KnowledgeDocument) -> Result<IndexSummary> {
        if self.index.initialized() || self.building.swap(true, Ordering::SeqCst) {
            return Err(AppError::Internal(
                "knowledge index is already built or being built".to_string(),
            ));
        }

        let start = Instant::now();
        let index = match self.ingest(document).await {
            Ok(index) => index,
            Err(e) => {
                self.building.store(false, Ordering::SeqCst);
                tracing::error!(error = %e, "Knowledge ingestion failed");
                return Err(e);
            }
        };

        let summary = IndexSummary {
            chunks: index.len(),
            dimensions: index.dimensions(),
            elapsed: start.elapsed(),
        };

        self.index
            .set(index)
            .map_err(|_| AppError::Internal("knowledge index was installed twice".to_string()))?;

        tracing::info!(
            chunks = summary.chunks,
            dimensions = summary.dimensions,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Knowledge index ready"
        );

        Ok(summary)
    }

    async fn ingest(&self, document: &KnowledgeDocument) -> Result<KnowledgeIndex> {
        let chunks = self.chunker.chunk(document.text());
        if chunks.is_empty() {
            return Err(AppError::Configuration(format!(
                "knowledge base file '{}' produced no chunks",
                document.path().display()
            )));
        }

        tracing::info!(
            chunks = chunks.len(),
            chunk_size = self.chunker.chunk_size(),
            chunk_overlap = self.chunker.chunk_overlap(),
            "Embedding knowledge chunks"
        );

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_documents(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(AppError::Embedding(format!(
                "expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        KnowledgeIndex::build(chunks, embeddings).await
    }

    /// Answer `query` from the knowledge base.
    ///
    /// The generator's output is returned verbatim. Failures are logged here
    /// with full detail; callers decide how much of them to expose.
    pub async fn answer(&self, query: &str) -> Result<String> {
        let index = self.index.get().ok_or(AppError::NotReady)?;

        let question = query.trim();
        if question.is_empty() {
            return Err(AppError::InvalidInput("query must not be empty".to_string()));
        }

        let start = Instant::now();
        match self.retrieve_and_generate(index, question).await {
            Ok(reply) => {
                tracing::info!(
                    query_len = question.len(),
                    reply_len = reply.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Query answered"
                );
                Ok(reply)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    collaborator = e.is_collaborator_failure(),
                    "Failed to answer query"
                );
                Err(e)
            }
        }
    }

    async fn retrieve_and_generate(&self, index: &KnowledgeIndex, question: &str) -> Result<String> {
        let query_vector = self.embedder.embed_query(question).await?;
        let retrieved = index.search(&query_vector, self.top_k).await?;

        tracing::debug!(
            retrieved = retrieved.len(),
            best_score = retrieved.first().map(|r| r.score),
            "Retrieved context"
        );

        let context = join_context(retrieved.iter().map(|r| r.content.as_str()));
        let prompt = self.prompt.render(&context, question);

        self.generator.generate(&prompt).await
    }
}
