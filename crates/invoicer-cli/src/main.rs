//! Invoicer CLI - Extract invoice fields from PDFs into a table.

use clap::Parser;
use invoicer_cli::logging::init_tracing;
use invoicer_cli::{run_batch, Cli, Config, Formatter};
use invoicer_extractor::{Extractor, ExtractorConfig, ProviderKind};
use invoicer_llm::{GeminiProvider, OllamaProvider};
use tracing::debug;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> invoicer_cli::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let extractor_config = config.resolve(&cli);
    debug!(config = ?extractor_config, "Resolved configuration");

    // Fail before building any client when the key is missing
    extractor_config.check_credentials()?;

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let table = match extractor_config.provider {
        ProviderKind::Gemini => {
            let provider = gemini_provider(&extractor_config)?;
            let extractor = Extractor::new(provider.clone(), provider, extractor_config)?;
            run_batch(&extractor, &cli.files).await?
        }
        ProviderKind::Ollama => {
            let provider = ollama_provider(&extractor_config)?;
            let extractor = Extractor::new(provider.clone(), provider, extractor_config)?;
            run_batch(&extractor, &cli.files).await?
        }
    };

    println!("{}", formatter.format_table(&table)?);
    for line in formatter.failures(table.failures()) {
        eprintln!("{}", line);
    }
    eprintln!("{}", formatter.summary(&table));

    Ok(())
}

fn gemini_provider(config: &ExtractorConfig) -> invoicer_cli::Result<GeminiProvider> {
    let api_key = config.api_key.clone().unwrap_or_default();
    let mut provider = GeminiProvider::new(api_key, &config.model, &config.embedding_model)?
        .with_max_retries(config.max_retries);
    if let Some(endpoint) = &config.endpoint {
        provider = provider.with_endpoint(endpoint);
    }
    Ok(provider.with_timeout(config.call_timeout())?)
}

fn ollama_provider(config: &ExtractorConfig) -> invoicer_cli::Result<OllamaProvider> {
    let provider = match &config.endpoint {
        Some(endpoint) => OllamaProvider::new(endpoint, &config.model, &config.embedding_model)?,
        None => OllamaProvider::default_endpoint(&config.model, &config.embedding_model)?,
    };
    Ok(provider
        .with_max_retries(config.max_retries)
        .with_timeout(config.call_timeout())?)
}
