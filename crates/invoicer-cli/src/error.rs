//! Error types for the `invoicer` binary.

use invoicer_extractor::ExtractorError;
use invoicer_llm::LlmError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that stop the whole run. Per-file problems never end up here.
#[derive(Debug, Error)]
pub enum CliError {
    /// Missing or unreadable configuration file
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file is not valid TOML for [`crate::Config`]
    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP client for the provider could not be built
    #[error("Cannot set up provider: {0}")]
    Provider(#[from] LlmError),

    /// Batch-level extraction error, such as a missing API key
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    /// Rendering results as JSON failed
    #[error("Cannot render output: {0}")]
    Output(#[from] serde_json::Error),
}
