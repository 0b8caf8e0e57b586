//! Integration tests for the Extractor

#[cfg(test)]
mod tests {
    use crate::segmenter::tests::create_multipage_pdf;
    use crate::{Extractor, ExtractorConfig, ExtractorError, ProviderKind};
    use invoicer_domain::{Document, FailureKind, Field, COLUMNS};
    use invoicer_llm::MockProvider;
    use invoicer_store::embedding::MockEmbeddingModel;
    use std::time::Duration;

    fn config() -> ExtractorConfig {
        ExtractorConfig::default().with_api_key("test-key")
    }

    fn txt(name: &str, text: &str) -> Document {
        Document::new(name, text.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn test_full_extraction_flow() {
        let llm = MockProvider::new(
            "Here you go:\n{'Invoice no.': '4521', 'Total': 'R$ 1.500,00', 'Email': 'a@b.com',}",
        );
        let extractor =
            Extractor::new(llm.clone(), MockEmbeddingModel::new(64), config()).unwrap();

        let document = txt(
            "invoice-4521.txt",
            "ACME Ltda\nInvoice No: 4521\nTotal: R$ 1.500,00\nemail: a@b.com",
        );
        let table = extractor.extract(vec![document]).await.unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.failures().is_empty());

        let row = &table.rows()[0];
        assert_eq!(row.file, "invoice-4521.txt");
        assert_eq!(row.get(Field::InvoiceNo), "4521");
        assert_eq!(row.get(Field::Total), "1500.00");
        assert_eq!(row.get(Field::Email), "a@b.com");
        for field in [Field::Description, Field::Quantity, Field::Date, Field::Address] {
            assert_eq!(row.get(field), "");
        }

        // The document text reached the model through retrieval
        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Invoice No: 4521"));
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_calls() {
        let llm = MockProvider::new("{}");
        let embedder = MockEmbeddingModel::new(16);
        // No API key: the credential check must not run for an empty batch
        let extractor =
            Extractor::new(llm.clone(), embedder.clone(), ExtractorConfig::default()).unwrap();

        let table = extractor.extract(Vec::new()).await.unwrap();

        assert!(table.is_empty());
        assert_eq!(table.headers(), &COLUMNS);
        assert_eq!(llm.call_count(), 0);
        assert_eq!(embedder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_credentials_abort_batch() {
        let llm = MockProvider::new("{}");
        let embedder = MockEmbeddingModel::new(16);
        let extractor =
            Extractor::new(llm.clone(), embedder.clone(), ExtractorConfig::default()).unwrap();

        let result = extractor
            .extract(vec![txt("a.txt", "Invoice No: 1")])
            .await;

        match result {
            Err(e @ ExtractorError::Configuration(_)) => assert_eq!(e.failure_kind(), None),
            other => panic!("expected configuration error, got {:?}", other),
        }
        assert_eq!(llm.call_count(), 0);
        assert_eq!(embedder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_ollama_runs_without_credentials() {
        let config = ExtractorConfig {
            provider: ProviderKind::Ollama,
            ..Default::default()
        };
        let extractor =
            Extractor::new(MockProvider::new("{}"), MockEmbeddingModel::new(16), config).unwrap();

        let table = extractor.extract(vec![txt("a.txt", "hello")]).await.unwrap();
        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn test_batch_with_failing_middle_document() {
        let mut llm = MockProvider::new("{}");
        llm.add_response("INV-A", r#"{"Invoice no.": "A", "Total": "10"}"#);
        llm.add_response("INV-C", r#"{"Invoice no.": "C", "Total": "30"}"#);

        let mut embedder = MockEmbeddingModel::new(32);
        embedder.add_failure("INV-B");

        let extractor = Extractor::new(llm.clone(), embedder, config()).unwrap();
        let table = extractor
            .extract(vec![
                txt("a.txt", "Invoice INV-A total 10"),
                txt("b.txt", "Invoice INV-B total 20"),
                txt("c.txt", "Invoice INV-C total 30"),
            ])
            .await
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].file, "a.txt");
        assert_eq!(table.rows()[0].get(Field::InvoiceNo), "A");
        assert_eq!(table.rows()[0].get(Field::Total), "10");
        assert_eq!(table.rows()[1].file, "c.txt");
        assert_eq!(table.rows()[1].get(Field::InvoiceNo), "C");
        assert_eq!(table.rows()[1].get(Field::Total), "30");

        assert_eq!(table.failures().len(), 1);
        let failure = &table.failures()[0];
        assert_eq!(failure.file, "b.txt");
        assert_eq!(failure.kind, FailureKind::RetrievalService);

        // Failed document never reached the model
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_completion_failure_is_recorded() {
        let mut llm = MockProvider::new("{}");
        llm.add_error("BROKEN");

        let extractor = Extractor::new(llm, MockEmbeddingModel::new(16), config()).unwrap();
        let table = extractor
            .extract(vec![txt("ok.txt", "fine"), txt("bad.txt", "BROKEN invoice")])
            .await
            .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.failures()[0].file, "bad.txt");
        assert_eq!(table.failures()[0].kind, FailureKind::RetrievalService);
        assert!(table.failures()[0].message.contains("LLM error"));
    }

    #[tokio::test]
    async fn test_unreadable_document_is_skipped() {
        let extractor =
            Extractor::new(MockProvider::new("{}"), MockEmbeddingModel::new(16), config()).unwrap();

        let table = extractor
            .extract(vec![
                Document::new("scan.tiff", vec![0x49, 0x49, 0x2a, 0x00]),
                Document::new("broken.pdf", b"%PDF-1.7 garbage".to_vec()),
                txt("fine.txt", "Invoice"),
            ])
            .await
            .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].file, "fine.txt");
        let kinds: Vec<FailureKind> = table.failures().iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![FailureKind::DocumentRead, FailureKind::DocumentRead]);
    }

    #[tokio::test]
    async fn test_timeout_only_affects_that_document() {
        let llm = MockProvider::new("{}").with_latency(Duration::from_secs(2));
        let config = ExtractorConfig {
            call_timeout_secs: 1,
            ..config()
        };
        let extractor = Extractor::new(llm, MockEmbeddingModel::new(16), config).unwrap();

        // A blank document still makes the completion call with empty context
        let table = extractor.extract(vec![txt("slow.txt", "")]).await.unwrap();

        assert!(table.is_empty());
        let failure = &table.failures()[0];
        assert_eq!(failure.kind, FailureKind::RetrievalService);
        assert!(failure.message.contains("completion timed out"));
    }

    #[tokio::test]
    async fn test_row_order_matches_input_under_concurrency() {
        let mut llm = MockProvider::new("{}");
        for i in 0..8 {
            llm.add_response(
                format!("DOC-{:02}", i),
                format!(r#"{{"Invoice no.": "{}"}}"#, i),
            );
        }
        let config = ExtractorConfig {
            concurrency: 3,
            ..config()
        };
        let extractor = Extractor::new(llm, MockEmbeddingModel::new(32), config).unwrap();

        let documents = (0..8)
            .map(|i| txt(&format!("{}.txt", i), &format!("Invoice DOC-{:02}", i)))
            .collect();
        let table = extractor.extract(documents).await.unwrap();

        let numbers: Vec<&str> = table.rows().iter().map(|r| r.get(Field::InvoiceNo)).collect();
        assert_eq!(numbers, vec!["0", "1", "2", "3", "4", "5", "6", "7"]);
    }

    #[tokio::test]
    async fn test_retrieval_limits_context() {
        let llm = MockProvider::new("{}");
        let config = ExtractorConfig {
            retrieval_k: 1,
            max_chunk_chars: 20,
            chunk_overlap_chars: 0,
            ..config()
        };
        let extractor = Extractor::new(llm.clone(), MockEmbeddingModel::new(32), config).unwrap();

        let text = "first paragraph\n\nsecond paragraph\n\nthird paragraph";
        extractor.extract(vec![txt("long.txt", text)]).await.unwrap();

        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("first paragraph"));
        assert!(!prompt.contains("third paragraph"));
    }

    #[tokio::test]
    async fn test_pdf_document() {
        let llm = MockProvider::new(r#"{"Invoice no.": "PDF-1", "Phone number": "+1 (555) 010-0000"}"#);
        let extractor = Extractor::new(llm, MockEmbeddingModel::new(32), config()).unwrap();

        let pdf = create_multipage_pdf(&["Invoice PDF-1", "Phone 555 0100"]);
        let table = extractor
            .extract(vec![Document::new("invoice.pdf", pdf)])
            .await
            .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].get(Field::InvoiceNo), "PDF-1");
        assert_eq!(table.rows()[0].get(Field::PhoneNumber), "15550100000");
    }
}
