//! TOML-based configuration for the support bot
//!
//! Infrastructure settings (server, knowledge file, chunking, model provider,
//! prompt) are read from `supportbot.toml`. Secrets are never written to the
//! file: the file names the environment variable that holds them.
//!
//! Every field has a default, so an absent default config file yields a
//! working configuration as long as `GOOGLE_API_KEY` is set.

use crate::rag::prompt::{DEFAULT_FALLBACK_PHRASE, DEFAULT_PROMPT_TEMPLATE, PromptTemplate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "supportbot.toml";

/// Root configuration structure loaded from supportbot.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupportBotConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    #[serde(default)]
    pub rag: RagConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub prompt: PromptConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Upper bound on request body size
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

// ============= Knowledge Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Path of the knowledge document, relative to the working directory
    #[serde(default = "default_knowledge_path")]
    pub path: PathBuf,
}

fn default_knowledge_path() -> PathBuf {
    PathBuf::from("knowledge_base.md")
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: default_knowledge_path(),
        }
    }
}

// ============= RAG Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    /// Maximum chunk length in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Chunks retrieved per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Texts per batchEmbedContents call (Gemini accepts at most 100)
    #[serde(default = "default_embedding_batch_size")]
    pub embedding_batch_size: usize,
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    100
}

fn default_top_k() -> usize {
    4
}

fn default_embedding_model() -> String {
    "text-embedding-004".to_string()
}

fn default_embedding_batch_size() -> usize {
    100
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
            embedding_model: default_embedding_model(),
            embedding_batch_size: default_embedding_batch_size(),
        }
    }
}

// ============= LLM Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Environment variable containing the Gemini API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Generation model
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    pub max_output_tokens: Option<u32>,

    /// Per-request timeout; unset means the provider decides
    pub timeout_secs: Option<u64>,
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            api_base: default_api_base(),
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: None,
            timeout_secs: None,
        }
    }
}

// ============= Prompt Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Grounding template with `{context}` and `{question}` placeholders
    #[serde(default = "default_prompt_template")]
    pub template: String,

    /// Phrase the model must use when the context has no answer
    #[serde(default = "default_fallback_phrase")]
    pub fallback_phrase: String,
}

fn default_prompt_template() -> String {
    DEFAULT_PROMPT_TEMPLATE.to_string()
}

fn default_fallback_phrase() -> String {
    DEFAULT_FALLBACK_PHRASE.to_string()
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template: default_prompt_template(),
            fallback_phrase: default_fallback_phrase(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl From<ConfigError> for crate::types::AppError {
    fn from(err: ConfigError) -> Self {
        crate::types::AppError::Configuration(err.to_string())
    }
}

impl SupportBotConfig {
    /// Load configuration from a TOML file.
    ///
    /// Only parses; call [`SupportBotConfig::validate`] before starting the server.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    ///
    /// Used for the implicit default path; an explicitly requested file must exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::FileNotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Validate the configuration for internal consistency and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_key()?;
        self.validate_offline()
    }

    /// Everything [`SupportBotConfig::validate`] checks except the credential.
    pub fn validate_offline(&self) -> Result<(), ConfigError> {
        let rag = &self.rag;
        if rag.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "rag.chunk_size must be greater than zero".to_string(),
            ));
        }
        if rag.chunk_overlap >= rag.chunk_size {
            return Err(ConfigError::ValidationError(format!(
                "rag.chunk_overlap ({}) must be smaller than rag.chunk_size ({})",
                rag.chunk_overlap, rag.chunk_size
            )));
        }
        if rag.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "rag.top_k must be greater than zero".to_string(),
            ));
        }
        if rag.embedding_batch_size == 0 || rag.embedding_batch_size > 100 {
            return Err(ConfigError::ValidationError(format!(
                "rag.embedding_batch_size must be between 1 and 100, got {}",
                rag.embedding_batch_size
            )));
        }

        if self.llm.model.trim().is_empty() || rag.embedding_model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.model and rag.embedding_model must be set".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::ValidationError(format!(
                "llm.temperature must be within 0.0..=2.0, got {}",
                self.llm.temperature
            )));
        }

        PromptTemplate::new(&self.prompt.template, &self.prompt.fallback_phrase)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok().filter(|v| !v.trim().is_empty())
    }

    /// Get the provider API key from the environment
    pub fn api_key(&self) -> Result<String, ConfigError> {
        self.resolve_env(&self.llm.api_key_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.llm.api_key_env.clone()))
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// The prompt template described by `[prompt]`.
    pub fn prompt_template(&self) -> crate::types::Result<PromptTemplate> {
        PromptTemplate::new(&self.prompt.template, &self.prompt.fallback_phrase)
    }
}
