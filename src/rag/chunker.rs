//! Text chunking for knowledge ingestion.
//!
//! Splitting is delegated to `text-splitter`, which descends through semantic
//! levels (paragraphs, sentences, words, graphemes) until every chunk fits the
//! configured character budget, and carries `chunk_overlap` characters of the
//! previous chunk into the next one.

use crate::types::{AppError, Chunk, Result};
use text_splitter::{Characters, ChunkConfig, TextSplitter};

pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    splitter: TextSplitter<Characters>,
}

impl TextChunker {
    /// Create a chunker with a character budget and overlap.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `chunk_size` is zero or
    /// `chunk_overlap` is not smaller than `chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(AppError::Configuration(
                "chunk size must be greater than zero".to_string(),
            ));
        }

        let config = ChunkConfig::new(chunk_size)
            .with_overlap(chunk_overlap)
            .map_err(|e| {
                AppError::Configuration(format!(
                    "invalid chunking parameters (size {}, overlap {}): {}",
                    chunk_size, chunk_overlap, e
                ))
            })?
            .with_trim(true);

        Ok(Self {
            chunk_size,
            chunk_overlap,
            splitter: TextSplitter::new(config),
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split `text` into ordered, non-empty chunks.
    ///
    /// Deterministic: the same text always yields the same sequence.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        self.splitter
            .chunk_indices(text)
            .filter(|(_, content)| !content.trim().is_empty())
            .enumerate()
            .map(|(index, (offset, content))| Chunk {
                index,
                offset,
                content: content.to_string(),
            })
            .collect()
    }
}
