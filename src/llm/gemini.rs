//! Google Gemini REST bindings
//!
//! Thin `reqwest` client for the `v1beta` Generative Language API. The API key
//! is sent in the `x-goog-api-key` header so it never appears in URLs, and
//! therefore never in transport error messages.

use crate::llm::client::LLMClient;
use crate::types::{AppError, Result};
use crate::utils::toml_config::SupportBotConfig;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Errors raised while talking to the Gemini API.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

// ============= Wire Types =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub(crate) fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EmbedContentRequest {
    pub model: String,
    pub content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchEmbedContentsRequest {
    pub requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentEmbedding {
    #[serde(default)]
    pub values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbedContentResponse {
    pub embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchEmbedContentsResponse {
    #[serde(default)]
    pub embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
    status: Option<String>,
}

// ============= Transport =============

/// Shared HTTP plumbing for generation and embedding calls.
#[derive(Clone)]
pub struct GeminiTransport {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl GeminiTransport {
    pub fn new(api_key: String, api_base: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Build the transport described by `[llm]`, resolving the API key.
    pub fn from_config(config: &SupportBotConfig) -> Result<Self> {
        let api_key = config.api_key()?;
        Self::new(
            api_key,
            config.llm.api_base.clone(),
            config.llm.timeout_secs.map(Duration::from_secs),
        )
    }

    /// `POST {api_base}/models/{model}:{method}` with a JSON body.
    pub(crate) async fn call<B, R>(
        &self,
        model: &str,
        method: &str,
        body: &B,
    ) -> std::result::Result<R, GeminiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}:{}", self.api_base, model_resource(model), method);

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorEnvelope>(&bytes)
                .map(|envelope| match envelope.error.status {
                    Some(kind) => format!("{}: {}", kind, envelope.error.message),
                    None => envelope.error.message,
                })
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).trim().to_string());
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| GeminiError::Malformed(e.to_string()))
    }
}

/// `models/{name}`, accepting names given with or without the prefix.
pub(crate) fn model_resource(model: &str) -> String {
    let name = model.strip_prefix("models/").unwrap_or(model);
    format!("models/{}", name)
}

// ============= Generation Client =============

pub struct GeminiClient {
    transport: GeminiTransport,
    model: String,
    temperature: f32,
    max_output_tokens: Option<u32>,
}

impl GeminiClient {
    pub fn new(
        transport: GeminiTransport,
        model: String,
        temperature: f32,
        max_output_tokens: Option<u32>,
    ) -> Self {
        Self {
            transport,
            model,
            temperature,
            max_output_tokens,
        }
    }

    pub fn from_config(transport: GeminiTransport, config: &SupportBotConfig) -> Self {
        Self::new(
            transport,
            config.llm.model.clone(),
            config.llm.temperature,
            config.llm.max_output_tokens,
        )
    }
}

#[async_trait]
impl LLMClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content::text(Some("user"), prompt)],
            generation_config: GenerationConfig {
                temperature: Some(self.temperature),
                max_output_tokens: self.max_output_tokens,
            },
        };

        let response: GenerateContentResponse = self
            .transport
            .call(&self.model, "generateContent", &request)
            .await
            .map_err(|e| AppError::LLM(e.to_string()))?;

        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
        {
            return Err(AppError::LLM(format!("Prompt blocked by provider: {}", reason)));
        }

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AppError::LLM("No candidates in Gemini response".to_string()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AppError::LLM(format!(
                "Empty response from Gemini (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
