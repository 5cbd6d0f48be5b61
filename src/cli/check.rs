//! `check` subcommand: validate the setup offline.
//!
//! Loads and validates configuration, reads the knowledge file and chunks it
//! exactly as the server would, without calling the model provider.

use crate::cli::output::Output;
use crate::rag::chunker::TextChunker;
use crate::rag::knowledge::KnowledgeDocument;
use crate::types::Result;
use crate::utils::toml_config::SupportBotConfig;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CheckReport {
    pub knowledge_path: PathBuf,
    pub knowledge_bytes: usize,
    pub chunks: usize,
    pub api_key_env: String,
    pub api_key_present: bool,
    pub embedding_model: String,
    pub generation_model: String,
}

/// Run every startup check that does not need the network.
///
/// A missing API key is reported rather than treated as a failure, so the
/// check can run on machines without credentials.
pub async fn run_check(config: &SupportBotConfig) -> Result<CheckReport> {
    config.validate_offline()?;

    let document = KnowledgeDocument::load(&config.knowledge.path).await?;
    let chunker = TextChunker::new(config.rag.chunk_size, config.rag.chunk_overlap)?;
    let chunks = chunker.chunk(document.text()).len();

    Ok(CheckReport {
        knowledge_path: document.path().to_path_buf(),
        knowledge_bytes: document.text().len(),
        chunks,
        api_key_env: config.llm.api_key_env.clone(),
        api_key_present: config.api_key().is_ok(),
        embedding_model: config.rag.embedding_model.clone(),
        generation_model: config.llm.model.clone(),
    })
}

impl CheckReport {
    pub fn print(&self, output: &Output) {
        output.header("Knowledge base");
        output.kv("path", &self.knowledge_path.display().to_string());
        output.kv("bytes", &self.knowledge_bytes.to_string());
        output.kv("chunks", &self.chunks.to_string());

        output.header("Models");
        output.kv("embedding", &self.embedding_model);
        output.kv("generation", &self.generation_model);

        println!();
        if self.api_key_present {
            output.success(&format!("{} is set", self.api_key_env));
            output.success("Configuration is valid");
        } else {
            output.warning(&format!(
                "{} is not set; the server will refuse to start",
                self.api_key_env
            ));
            output.hint(&format!("export {}=<your key> or add it to .env", self.api_key_env));
        }
    }
}
