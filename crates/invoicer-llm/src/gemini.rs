//! Gemini Provider Implementation
//!
//! Integration with the Google Generative Language REST API: chat
//! completions through `generateContent` and embeddings through
//! `batchEmbedContents`. Requires an API key.
//!
//! # Examples
//!
//! ```no_run
//! use invoicer_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::new("my-api-key", "gemini-2.0-flash", "models/embedding-001")
//!     .unwrap();
//! ```

use crate::http::{build_client, post_json};
use crate::LlmError;
use invoicer_domain::traits::{EmbeddingProvider, LlmProvider};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Generative Language API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "models/embedding-001";

/// Default timeout for requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Maximum number of texts per `batchEmbedContents` request
const MAX_EMBED_BATCH: usize = 100;

/// Gemini API provider
#[derive(Clone)]
pub struct GeminiProvider {
    endpoint: String,
    api_key: String,
    model: String,
    embedding_model: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Serialize)]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, or empty when there is none
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

/// Prefix a bare model id with `models/`
fn model_path(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider on the public endpoint
    ///
    /// # Parameters
    ///
    /// - `api_key`: Generative Language API key
    /// - `model`: Chat model (e.g., "gemini-2.0-flash")
    /// - `embedding_model`: Embedding model (e.g., "models/embedding-001")
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        embedding_model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let api_key: String = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Authentication("missing Gemini API key".to_string()));
        }

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.trim().to_string(),
            model: model_path(&model.into()),
            embedding_model: model_path(&embedding_model.into()),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Use a different API endpoint (e.g. a proxy)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    fn headers(&self) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| LlmError::Authentication("invalid Gemini API key".to_string()))?;
        headers.insert("x-goog-api-key", key);
        Ok(headers)
    }

    /// Complete a prompt with `generateContent` at temperature 0
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/{}:generateContent", self.endpoint, self.model);
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig { temperature: 0.0 },
        };

        let response: GenerateContentResponse = post_json(
            &self.client,
            &url,
            self.headers()?,
            &request_body,
            self.max_retries,
            &self.model,
        )
        .await?;

        let text = response.into_text();
        debug!(model = %self.model, "Gemini answered with {} chars", text.len());
        Ok(text)
    }

    /// Embed texts with `batchEmbedContents`
    pub async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        let url = format!("{}/{}:batchEmbedContents", self.endpoint, self.embedding_model);
        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(MAX_EMBED_BATCH) {
            let request_body = BatchEmbedRequest {
                requests: batch
                    .iter()
                    .map(|text| EmbedContentRequest {
                        model: &self.embedding_model,
                        content: Content {
                            role: None,
                            parts: vec![Part { text: text.as_str() }],
                        },
                    })
                    .collect(),
            };

            let response: BatchEmbedResponse = post_json(
                &self.client,
                &url,
                self.headers()?,
                &request_body,
                self.max_retries,
                &self.embedding_model,
            )
            .await?;

            if response.embeddings.len() != batch.len() {
                return Err(LlmError::InvalidResponse(format!(
                    "Gemini returned {} embeddings for {} inputs",
                    response.embeddings.len(),
                    batch.len()
                )));
            }
            vectors.extend(response.embeddings.into_iter().map(|e| e.values));
        }

        Ok(vectors)
    }
}

impl LlmProvider for GeminiProvider {
    type Error = LlmError;

    async fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        self.generate(prompt).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

impl EmbeddingProvider for GeminiProvider {
    type Error = LlmError;

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, Self::Error> {
        self.embed_texts(texts).await
    }

    fn model_name(&self) -> &str {
        &self.embedding_model
    }
}
