//! Retrieval Augmented Generation (RAG) Pipeline
//!
//! The pieces the query service wires together:
//!
//! - [`knowledge`] - loads the knowledge document at startup
//! - [`chunker`] - splits it into overlapping, size-bounded chunks
//! - [`embeddings`] - turns chunks and questions into vectors
//! - [`index`] - cosine similarity search over the chunk vectors
//! - [`prompt`] - renders retrieved context and the question into a prompt
//!
//! # Pipeline
//!
//! 1. **Ingestion** - the document is chunked and every chunk embedded
//! 2. **Indexing** - vectors go into an in-memory HNSW collection
//! 3. **Retrieval** - the question is embedded and the top-k chunks found
//! 4. **Generation** - the LLM answers from those chunks only

pub mod chunker;
pub mod embeddings;
pub mod index;
pub mod knowledge;
pub mod prompt;
