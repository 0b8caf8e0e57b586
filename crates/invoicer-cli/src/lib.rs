//! Invoicer CLI library.
//!
//! Argument parsing, configuration files, file loading and output
//! formatting for the `invoicer` binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod output;

pub use cli::Cli;
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;

use invoicer_domain::traits::{EmbeddingProvider, LlmProvider};
use invoicer_domain::ResultTable;
use invoicer_extractor::Extractor;
use std::path::Path;

/// Read `paths` and extract one row per readable file.
///
/// Files that cannot be read are reported in the table's failures
/// alongside documents whose pipeline failed.
pub async fn run_batch<L, E, P>(extractor: &Extractor<L, E>, paths: &[P]) -> Result<ResultTable>
where
    L: LlmProvider,
    E: EmbeddingProvider,
    P: AsRef<Path>,
{
    let loaded = input::load_files(paths);
    let mut table = extractor.extract(loaded.documents).await?;
    for failure in loaded.failures {
        table.push_failure(failure);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoicer_domain::FailureKind;
    use invoicer_extractor::ExtractorConfig;
    use invoicer_llm::MockProvider;
    use invoicer_store::embedding::MockEmbeddingModel;
    use std::fs;

    #[tokio::test]
    async fn test_run_batch_mixes_rows_and_read_failures() {
        let dir = tempfile::tempdir().unwrap();
        let invoice = dir.path().join("invoice.txt");
        fs::write(&invoice, "Invoice No: 77\nTotal: 1.234,50").unwrap();
        let missing = dir.path().join("gone.pdf");

        let llm = MockProvider::new(r#"{"Invoice no.": "77", "Total": "1.234,50"}"#);
        let extractor = Extractor::new(
            llm.clone(),
            MockEmbeddingModel::new(16),
            ExtractorConfig::default().with_api_key("k"),
        )
        .unwrap();

        let table = run_batch(&extractor, &[&missing, &invoice]).await.unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].file, "invoice.txt");
        assert_eq!(table.rows()[0].cells()[7], "1234.50");
        assert_eq!(table.failures().len(), 1);
        assert_eq!(table.failures()[0].file, "gone.pdf");
        assert_eq!(table.failures()[0].kind, FailureKind::DocumentRead);
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_run_batch_without_credentials_fails() {
        let dir = tempfile::tempdir().unwrap();
        let invoice = dir.path().join("invoice.txt");
        fs::write(&invoice, "Invoice No: 1").unwrap();

        let extractor = Extractor::new(
            MockProvider::new("{}"),
            MockEmbeddingModel::new(16),
            ExtractorConfig::default(),
        )
        .unwrap();

        let result = run_batch(&extractor, &[&invoice]).await;
        assert!(matches!(result, Err(CliError::Extractor(_))));
    }
}
