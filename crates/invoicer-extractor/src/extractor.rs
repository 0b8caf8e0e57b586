//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::normalizer::normalize;
use crate::parser::parse;
use crate::prompt::PromptBuilder;
use crate::segmenter::Segmenter;
use futures::stream::{self, StreamExt};
use invoicer_domain::traits::{EmbeddingProvider, LlmProvider};
use invoicer_domain::{CanonicalRecord, Document, DocumentFailure, ResultTable};
use invoicer_store::EmbeddingIndex;
use std::future::Future;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The Extractor turns invoice documents into canonical records
///
/// Each document runs through segmentation, embedding, retrieval, one
/// completion call, tolerant parsing and normalization. Documents are
/// independent; up to `concurrency` of them are in flight at once and
/// results keep input order.
pub struct Extractor<L, E>
where
    L: LlmProvider,
    E: EmbeddingProvider,
{
    llm_provider: L,
    embedder: E,
    segmenter: Segmenter,
    config: ExtractorConfig,
}

impl<L, E> Extractor<L, E>
where
    L: LlmProvider,
    E: EmbeddingProvider,
{
    /// Create a new Extractor
    ///
    /// # Errors
    ///
    /// [`ExtractorError::Configuration`] when `config` does not validate.
    pub fn new(llm_provider: L, embedder: E, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Configuration)?;

        Ok(Self {
            llm_provider,
            embedder,
            segmenter: Segmenter::from_config(&config),
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract one row per document
    ///
    /// An empty batch returns an empty table without touching the
    /// providers or checking credentials. Documents that fail are left
    /// out of the rows and listed in [`ResultTable::failures`].
    ///
    /// # Errors
    ///
    /// Only batch-level errors: a missing credential.
    pub async fn extract(&self, documents: Vec<Document>) -> Result<ResultTable, ExtractorError> {
        let mut table = ResultTable::new();
        if documents.is_empty() {
            debug!("No documents to extract");
            return Ok(table);
        }

        self.config.check_credentials()?;

        let start = Instant::now();
        info!(
            documents = documents.len(),
            model = self.llm_provider.model_name(),
            embedding_model = self.embedder.model_name(),
            concurrency = self.config.concurrency,
            "Starting extraction batch"
        );

        let outcomes: Vec<_> = stream::iter(documents.iter())
            .map(|document| async move { (document, self.extract_document(document).await) })
            .buffered(self.config.concurrency)
            .collect()
            .await;

        for (document, outcome) in outcomes {
            match outcome {
                Ok(record) => table.push_row(document.name.clone(), record),
                Err(e) => {
                    let Some(kind) = e.failure_kind() else {
                        return Err(e);
                    };
                    warn!(file = %document.name, error = %e, "Skipping document");
                    table.push_failure(DocumentFailure {
                        file: document.name.clone(),
                        kind,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            rows = table.len(),
            failed = table.failures().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Extraction batch complete"
        );

        Ok(table)
    }

    /// Run the full pipeline for a single document
    pub async fn extract_document(&self, document: &Document) -> Result<CanonicalRecord, ExtractorError> {
        let chunks = self.segmenter.segment(document)?;

        let index = self
            .with_timeout("embedding", EmbeddingIndex::build(&self.embedder, chunks))
            .await??;

        let context = self
            .with_timeout(
                "retrieval",
                index.retrieve(
                    &self.embedder,
                    &self.config.retrieval_query,
                    self.config.retrieval_k,
                ),
            )
            .await??;

        let prompt = PromptBuilder::from_chunks(context).build();
        debug!(file = %document.name, prompt_chars = prompt.len(), "Prompt built");

        let response = self
            .with_timeout("completion", self.llm_provider.complete(&prompt))
            .await?
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;
        debug!(file = %document.name, response_chars = response.len(), "Model responded");

        let record = normalize(&parse(&response));
        info!(file = %document.name, filled = record.filled_count(), "Document extracted");

        Ok(record)
    }

    /// Bound an external call by the configured timeout
    async fn with_timeout<F: Future>(
        &self,
        stage: &'static str,
        call: F,
    ) -> Result<F::Output, ExtractorError> {
        timeout(self.config.call_timeout(), call)
            .await
            .map_err(|_| ExtractorError::Timeout {
                stage,
                secs: self.config.call_timeout_secs,
            })
    }
}
