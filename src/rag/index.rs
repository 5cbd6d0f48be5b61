//! In-memory similarity index over knowledge chunks.
//!
//! Vectors live in an `ares-vector` HNSW collection using cosine similarity;
//! chunk text is kept alongside so search results can be returned without a
//! metadata round trip.

use crate::types::{AppError, Chunk, Result, RetrievedChunk};
use ares_vector::{Config, DistanceMetric, VectorDb};

const COLLECTION: &str = "knowledge";

fn vector_id(index: usize) -> String {
    format!("chunk-{}", index)
}

fn parse_vector_id(id: &str) -> Option<usize> {
    id.strip_prefix("chunk-")?.parse().ok()
}

/// Searchable, read-only index built once at startup.
pub struct KnowledgeIndex {
    db: VectorDb,
    chunks: Vec<Chunk>,
    dimensions: usize,
}

impl KnowledgeIndex {
    /// Build the index from chunks and their embeddings, paired by position.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::VectorStore`] if there is nothing to index, the
    /// counts differ, or the vectors disagree on dimension.
    pub async fn build(chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if chunks.is_empty() {
            return Err(AppError::VectorStore("no chunks to index".to_string()));
        }
        if chunks.len() != embeddings.len() {
            return Err(AppError::VectorStore(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        let dimensions = embeddings[0].len();
        if dimensions == 0 {
            return Err(AppError::VectorStore(
                "embeddings must have at least one dimension".to_string(),
            ));
        }

        let db = VectorDb::open(Config::memory())
            .await
            .map_err(|e| AppError::VectorStore(format!("Failed to open vector store: {}", e)))?;

        db.create_collection(COLLECTION, dimensions, DistanceMetric::Cosine)
            .await
            .map_err(|e| AppError::VectorStore(format!("Failed to create collection: {}", e)))?;

        for (position, embedding) in embeddings.iter().enumerate() {
            if embedding.len() != dimensions {
                return Err(AppError::VectorStore(format!(
                    "embedding {} has {} dimensions, expected {}",
                    position,
                    embedding.len(),
                    dimensions
                )));
            }
            db.insert(COLLECTION, &vector_id(position), embedding, None)
                .await
                .map_err(|e| AppError::VectorStore(format!("Failed to insert vector: {}", e)))?;
        }

        Ok(Self {
            db,
            chunks,
            dimensions,
        })
    }

    /// Up to `k` chunks most similar to `query`, best first.
    pub async fn search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievedChunk>> {
        if query.len() != self.dimensions {
            return Err(AppError::VectorStore(format!(
                "query has {} dimensions, index has {}",
                query.len(),
                self.dimensions
            )));
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let hits = self
            .db
            .search(COLLECTION, query, k)
            .await
            .map_err(|e| AppError::VectorStore(format!("Search failed: {}", e)))?;

        let mut results: Vec<RetrievedChunk> = hits
            .into_iter()
            .filter_map(|hit| {
                let chunk = self.chunks.get(parse_vector_id(&hit.id)?)?;
                Some(RetrievedChunk {
                    index: chunk.index,
                    content: chunk.content.clone(),
                    score: hit.score,
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);

        Ok(results)
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: usize, content: &str) -> Chunk {
        Chunk {
            index,
            offset: index * 100,
            content: content.to_string(),
        }
    }

    async fn sample_index() -> KnowledgeIndex {
        let chunks = vec![
            chunk(0, "opening hours"),
            chunk(1, "location"),
            chunk(2, "menu"),
        ];
        let embeddings = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ];
        KnowledgeIndex::build(chunks, embeddings).await.unwrap()
    }

    #[test]
    fn test_vector_id_roundtrip() {
        assert_eq!(parse_vector_id(&vector_id(42)), Some(42));
        assert_eq!(parse_vector_id("doc-1"), None);
    }

    #[tokio::test]
    async fn test_build_reports_size() {
        let index = sample_index().await;
        assert_eq!(index.len(), 3);
        assert!(!index.is_empty());
        assert_eq!(index.dimensions(), 3);
    }

    #[tokio::test]
    async fn test_search_returns_nearest_first() {
        let index = sample_index().await;

        let results = index.search(&[0.1, 0.9, 0.0], 2).await.unwrap();
        assert!(!results.is_empty());
        assert!(results.len() <= 2);
        assert_eq!(results[0].content, "location");
        assert_eq!(results[0].index, 1);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn test_search_caps_at_k() {
        let index = sample_index().await;
        let results = index.search(&[0.5, 0.5, 0.5], 10).await.unwrap();
        assert!(results.len() <= 3);

        let none = index.search(&[0.5, 0.5, 0.5], 0).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_search_rejects_wrong_dimension() {
        let index = sample_index().await;
        let err = index.search(&[1.0, 0.0], 2).await.unwrap_err();
        assert!(matches!(err, AppError::VectorStore(_)));
    }

    #[tokio::test]
    async fn test_build_rejects_mismatched_input() {
        let err = KnowledgeIndex::build(vec![chunk(0, "a"), chunk(1, "b")], vec![vec![1.0, 0.0]])
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::VectorStore(_)));

        let err = KnowledgeIndex::build(
            vec![chunk(0, "a"), chunk(1, "b")],
            vec![vec![1.0, 0.0], vec![1.0]],
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(err, AppError::VectorStore(_)));

        let err = KnowledgeIndex::build(Vec::new(), Vec::new())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::VectorStore(_)));
    }
}
