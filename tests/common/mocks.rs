//! Stub collaborators for testing.
//!
//! Deterministic stand-ins for the embedding provider and the LLM so the HTTP
//! surface can be exercised end to end without network access.

use async_trait::async_trait;
use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use supportbot::LLMClient;
use supportbot::rag::embeddings::EmbeddingProvider;
use supportbot::rag::prompt::DEFAULT_FALLBACK_PHRASE;
use supportbot::types::{AppError, Result};

pub const STUB_DIMENSIONS: usize = 64;

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
}

/// Hashed bag-of-words with a constant bias component, so no vector is zero.
pub fn bag_of_words(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0; STUB_DIMENSIONS];
    vector[0] = 0.1;
    for word in words(text) {
        let mut hasher = DefaultHasher::new();
        word.hash(&mut hasher);
        vector[1 + (hasher.finish() as usize % (STUB_DIMENSIONS - 1))] += 1.0;
    }
    vector
}

/// Embedding provider backed by [`bag_of_words`].
#[derive(Default)]
pub struct StubEmbedder {
    fail_documents: bool,
    fail_queries: bool,
    pub document_calls: AtomicUsize,
    pub query_calls: AtomicUsize,
}

impl StubEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every document batch, so ingestion never completes.
    pub fn failing_documents() -> Self {
        Self {
            fail_documents: true,
            ..Self::default()
        }
    }

    /// Ingests fine, then fails every query embedding.
    pub fn failing_queries() -> Self {
        Self {
            fail_queries: true,
            ..Self::default()
        }
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_documents {
            return Err(AppError::Embedding(
                "Stub embedder: API key not valid".to_string(),
            ));
        }
        Ok(texts.iter().map(|t| bag_of_words(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_queries {
            return Err(AppError::Embedding(
                "Stub embedder: connection reset by peer".to_string(),
            ));
        }
        Ok(bag_of_words(text))
    }

    fn model_name(&self) -> &str {
        "stub-embedder"
    }
}

/// Generator that answers extractively from the prompt's context block.
///
/// Replies with the first context sentence sharing a word longer than three
/// letters with the question, or with the fallback phrase when none does.
#[derive(Default)]
pub struct StubGenerator {
    should_fail: bool,
    prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator whose every call fails with a provider-looking message.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

fn section<'a>(prompt: &'a str, start: &str, end: &str) -> &'a str {
    let Some(from) = prompt.find(start) else {
        return "";
    };
    let rest = &prompt[from + start.len()..];
    rest.find(end).map_or(rest, |to| &rest[..to]).trim()
}

#[async_trait]
impl LLMClient for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.should_fail {
            return Err(AppError::LLM(
                "Stub generator: 429 RESOURCE_EXHAUSTED secret-quota-detail".to_string(),
            ));
        }

        let context = section(prompt, "CONTEXT:", "USER'S QUESTION:");
        let question = section(prompt, "USER'S QUESTION:", "YOUR ANSWER:");
        let keywords: HashSet<String> = words(question).filter(|w| w.len() > 3).collect();

        let answer = context
            .split(['.', '\n'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .find(|sentence| words(sentence).any(|w| keywords.contains(&w)));

        Ok(match answer {
            Some(sentence) => format!("{}.", sentence),
            None => DEFAULT_FALLBACK_PHRASE.to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "stub-generator"
    }
}
