//! Command-line argument parsing.

use clap::Parser;
use invoicer_extractor::ProviderKind;
use std::path::PathBuf;

/// Invoicer - Extract structured fields from invoice PDFs.
#[derive(Debug, Parser)]
#[command(name = "invoicer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Invoice files to process (PDF, or .txt with form-feed page breaks)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.invoicer/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Model provider (gemini or ollama)
    #[arg(long)]
    pub provider: Option<ProviderKind>,

    /// Completion model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Embedding model
    #[arg(long)]
    pub embedding_model: Option<String>,

    /// Provider API base URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Number of chunks given to the model as context
    #[arg(short = 'k', long)]
    pub retrieval_k: Option<usize>,

    /// Retrieval query (empty uses the first chunks)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Per-call timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Documents processed concurrently
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Google API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}
