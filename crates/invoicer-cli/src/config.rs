//! Configuration management for the CLI.

use crate::cli::{Cli, CliFormat};
use crate::error::{CliError, Result};
use invoicer_extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Extraction pipeline settings
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
        }
    }
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".invoicer").join("config.toml"))
    }

    /// Load the configuration named on the command line, or the default
    /// file if it exists, or built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply command-line overrides and the API key to the extractor settings.
    pub fn resolve(&self, cli: &Cli) -> ExtractorConfig {
        let mut config = self.extractor.clone();

        if let Some(provider) = cli.provider {
            if provider != config.provider {
                // Models of one provider are meaningless to the other
                config.model = provider.default_model().to_string();
                config.embedding_model = provider.default_embedding_model().to_string();
                config.endpoint = None;
            }
            config.provider = provider;
        }
        if let Some(model) = &cli.model {
            config.model = model.clone();
        }
        if let Some(embedding_model) = &cli.embedding_model {
            config.embedding_model = embedding_model.clone();
        }
        if let Some(endpoint) = &cli.endpoint {
            config.endpoint = Some(endpoint.clone());
        }
        if let Some(k) = cli.retrieval_k {
            config.retrieval_k = k;
        }
        if let Some(query) = &cli.query {
            config.retrieval_query = query.clone();
        }
        if let Some(timeout) = cli.timeout {
            config.call_timeout_secs = timeout;
        }
        if let Some(concurrency) = cli.concurrency {
            config.concurrency = concurrency;
        }
        config.api_key = cli.api_key.clone();

        config
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
