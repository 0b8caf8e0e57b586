//! Configuration for the Extractor

use crate::error::ExtractorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Backend serving completions and embeddings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Generative Language API; needs an API key
    #[default]
    Gemini,
    /// Local Ollama server
    Ollama,
}

impl ProviderKind {
    /// Whether this provider requires an API key
    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderKind::Gemini)
    }

    /// Default completion model
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-2.0-flash",
            ProviderKind::Ollama => "llama3",
        }
    }

    /// Default embedding model
    pub fn default_embedding_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "models/embedding-001",
            ProviderKind::Ollama => "nomic-embed-text",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Gemini => f.write_str("gemini"),
            ProviderKind::Ollama => f.write_str("ollama"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "ollama" => Ok(ProviderKind::Ollama),
            other => Err(format!(
                "unknown provider '{}' (expected 'gemini' or 'ollama')",
                other
            )),
        }
    }
}

/// Configuration for the Extractor
///
/// Models left out of a configuration file default to those of the
/// configured provider.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "ConfigFile")]
pub struct ExtractorConfig {
    /// Completion/embedding backend
    pub provider: ProviderKind,

    /// Completion model identifier
    pub model: String,

    /// Embedding model identifier
    pub embedding_model: String,

    /// Base URL override for the provider API
    pub endpoint: Option<String>,

    /// Number of chunks retrieved as prompt context
    pub retrieval_k: usize,

    /// Retrieval query; blank selects the leading chunks
    pub retrieval_query: String,

    /// Maximum time for a single external call (seconds)
    pub call_timeout_secs: u64,

    /// Retry attempts for transient HTTP failures
    pub max_retries: u32,

    /// Documents processed at once
    pub concurrency: usize,

    /// Maximum chunk size (characters)
    pub max_chunk_chars: usize,

    /// Characters shared by consecutive chunks of a page
    pub chunk_overlap_chars: usize,

    /// Provider credential; supplied at runtime, never written to disk
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl ExtractorConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.embedding_model.trim().is_empty() {
            return Err("embedding_model must not be empty".to_string());
        }
        if self.retrieval_k == 0 {
            return Err("retrieval_k must be greater than 0".to_string());
        }
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        if self.concurrency == 0 {
            return Err("concurrency must be greater than 0".to_string());
        }
        if self.max_chunk_chars == 0 {
            return Err("max_chunk_chars must be greater than 0".to_string());
        }
        if self.chunk_overlap_chars >= self.max_chunk_chars {
            return Err("chunk_overlap_chars must be smaller than max_chunk_chars".to_string());
        }
        Ok(())
    }

    /// Check that the credential required by the provider is present
    pub fn check_credentials(&self) -> Result<(), ExtractorError> {
        if !self.provider.requires_api_key() {
            return Ok(());
        }
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(ExtractorError::Configuration(format!(
                "the {} provider requires an API key (set GOOGLE_API_KEY)",
                self.provider
            ))),
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        let provider = ProviderKind::default();
        Self {
            provider,
            model: provider.default_model().to_string(),
            embedding_model: provider.default_embedding_model().to_string(),
            endpoint: None,
            retrieval_k: 6,
            retrieval_query: String::new(),
            call_timeout_secs: 120,
            max_retries: 3,
            concurrency: 4,
            max_chunk_chars: 4000,
            chunk_overlap_chars: 200,
            api_key: None,
        }
    }
}

/// On-disk form of [`ExtractorConfig`]; model names are optional
#[derive(Deserialize)]
#[serde(default)]
struct ConfigFile {
    provider: ProviderKind,
    model: Option<String>,
    embedding_model: Option<String>,
    endpoint: Option<String>,
    retrieval_k: usize,
    retrieval_query: String,
    call_timeout_secs: u64,
    max_retries: u32,
    concurrency: usize,
    max_chunk_chars: usize,
    chunk_overlap_chars: usize,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let defaults = ExtractorConfig::default();
        Self {
            provider: defaults.provider,
            model: None,
            embedding_model: None,
            endpoint: defaults.endpoint,
            retrieval_k: defaults.retrieval_k,
            retrieval_query: defaults.retrieval_query,
            call_timeout_secs: defaults.call_timeout_secs,
            max_retries: defaults.max_retries,
            concurrency: defaults.concurrency,
            max_chunk_chars: defaults.max_chunk_chars,
            chunk_overlap_chars: defaults.chunk_overlap_chars,
        }
    }
}

impl From<ConfigFile> for ExtractorConfig {
    fn from(file: ConfigFile) -> Self {
        let provider = file.provider;
        Self {
            provider,
            model: file
                .model
                .unwrap_or_else(|| provider.default_model().to_string()),
            embedding_model: file
                .embedding_model
                .unwrap_or_else(|| provider.default_embedding_model().to_string()),
            endpoint: file.endpoint,
            retrieval_k: file.retrieval_k,
            retrieval_query: file.retrieval_query,
            call_timeout_secs: file.call_timeout_secs,
            max_retries: file.max_retries,
            concurrency: file.concurrency,
            max_chunk_chars: file.max_chunk_chars,
            chunk_overlap_chars: file.chunk_overlap_chars,
            api_key: None,
        }
    }
}

impl fmt::Debug for ExtractorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("embedding_model", &self.embedding_model)
            .field("endpoint", &self.endpoint)
            .field("retrieval_k", &self.retrieval_k)
            .field("retrieval_query", &self.retrieval_query)
            .field("call_timeout_secs", &self.call_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("concurrency", &self.concurrency)
            .field("max_chunk_chars", &self.max_chunk_chars)
            .field("chunk_overlap_chars", &self.chunk_overlap_chars)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider, ProviderKind::Gemini);
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.embedding_model, "models/embedding-001");
        assert_eq!(config.retrieval_k, 6);
        assert_eq!(config.call_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_invalid_values() {
        let cases: [fn(&mut ExtractorConfig); 6] = [
            |c| c.retrieval_k = 0,
            |c| c.call_timeout_secs = 0,
            |c| c.concurrency = 0,
            |c| c.max_chunk_chars = 0,
            |c| c.chunk_overlap_chars = c.max_chunk_chars,
            |c| c.model = "  ".to_string(),
        ];

        for mutate in cases {
            let mut config = ExtractorConfig::default();
            mutate(&mut config);
            assert!(config.validate().is_err(), "{:?} should be invalid", config);
        }
    }

    #[test]
    fn test_credentials_required_for_gemini() {
        let config = ExtractorConfig::default();
        assert!(matches!(
            config.check_credentials(),
            Err(ExtractorError::Configuration(_))
        ));

        let blank = ExtractorConfig::default().with_api_key("   ");
        assert!(blank.check_credentials().is_err());

        let ok = ExtractorConfig::default().with_api_key("secret");
        assert!(ok.check_credentials().is_ok());
    }

    #[test]
    fn test_ollama_needs_no_credentials() {
        let config = ExtractorConfig {
            provider: ProviderKind::Ollama,
            ..Default::default()
        };
        assert!(config.check_credentials().is_ok());
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("Gemini".parse::<ProviderKind>(), Ok(ProviderKind::Gemini));
        assert_eq!(" ollama ".parse::<ProviderKind>(), Ok(ProviderKind::Ollama));
        assert!("openai".parse::<ProviderKind>().is_err());
        assert_eq!(ProviderKind::Ollama.to_string(), "ollama");
    }

    #[test]
    fn test_toml_round_trip_omits_api_key() {
        let config = ExtractorConfig::default().with_api_key("secret");
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(!toml_str.contains("secret"));

        let parsed: ExtractorConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.api_key, None);
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.retrieval_k, config.retrieval_k);
        assert_eq!(parsed.chunk_overlap_chars, config.chunk_overlap_chars);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: ExtractorConfig =
            toml::from_str("provider = \"ollama\"\nmodel = \"mistral\"\nretrieval_k = 3\n")
                .unwrap();
        assert_eq!(parsed.provider, ProviderKind::Ollama);
        assert_eq!(parsed.model, "mistral");
        assert_eq!(parsed.embedding_model, "nomic-embed-text");
        assert_eq!(parsed.retrieval_k, 3);
        assert_eq!(parsed.concurrency, 4);
    }

    #[test]
    fn test_missing_models_follow_provider() {
        let parsed: ExtractorConfig = toml::from_str("provider = \"ollama\"\n").unwrap();
        assert_eq!(parsed.model, "llama3");
        assert_eq!(parsed.embedding_model, "nomic-embed-text");
        assert!(parsed.validate().is_ok());

        let parsed: ExtractorConfig = toml::from_str("retrieval_k = 2\n").unwrap();
        assert_eq!(parsed.provider, ProviderKind::Gemini);
        assert_eq!(parsed.model, "gemini-2.0-flash");
        assert_eq!(parsed.embedding_model, "models/embedding-001");
    }

    #[test]
    fn test_empty_toml_is_default() {
        let parsed: ExtractorConfig = toml::from_str("").unwrap();
        assert_eq!(parsed, ExtractorConfig::default());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ExtractorConfig::default().with_api_key("super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
