//! Retrieval tests over realistic invoice chunks

use invoicer_domain::Chunk;
use invoicer_store::embedding::MockEmbeddingModel;
use invoicer_store::EmbeddingIndex;

fn invoice_chunks() -> Vec<Chunk> {
    [
        "ACME Corporation, 42 Harbour Road, Springfield",
        "Invoice no. INV-2024-001 issued 2024-03-15",
        "Description: consulting services Quantity: 10",
        "Unit price 150.00 Amount 1500.00",
        "Total due 1500.00 payable within 30 days",
        "Contact billing@acme.example or +1 555 0100",
    ]
    .iter()
    .enumerate()
    .map(|(i, text)| Chunk {
        text: text.to_string(),
        page: 1 + i / 3,
        index: i,
        offset: 0,
    })
    .collect()
}

#[tokio::test]
async fn test_query_ranks_lexically_closest_chunk_first() {
    let embedder = MockEmbeddingModel::new(256);
    let index = EmbeddingIndex::build(&embedder, invoice_chunks()).await.unwrap();

    let hits = index
        .retrieve(&embedder, "invoice no issued", 3)
        .await
        .unwrap();

    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].index, 1);
}

#[tokio::test]
async fn test_k_larger_than_document() {
    let embedder = MockEmbeddingModel::new(256);
    let index = EmbeddingIndex::build(&embedder, invoice_chunks()).await.unwrap();

    let hits = index.retrieve(&embedder, "total", 50).await.unwrap();
    assert_eq!(hits.len(), 6);

    let mut ids: Vec<usize> = hits.iter().map(|c| c.index).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_retrieval_is_deterministic() {
    let embedder = MockEmbeddingModel::new(256);
    let index = EmbeddingIndex::build(&embedder, invoice_chunks()).await.unwrap();

    let first: Vec<usize> = index
        .retrieve(&embedder, "unit price amount", 4)
        .await
        .unwrap()
        .iter()
        .map(|c| c.index)
        .collect();
    let second: Vec<usize> = index
        .retrieve(&embedder, "unit price amount", 4)
        .await
        .unwrap()
        .iter()
        .map(|c| c.index)
        .collect();

    assert_eq!(first, second);
    assert_eq!(first[0], 3);
}

#[tokio::test]
async fn test_query_embedding_failure() {
    let embedder = MockEmbeddingModel::new(64);
    let index = EmbeddingIndex::build(&embedder, invoice_chunks()).await.unwrap();

    let mut failing = embedder.clone();
    failing.add_failure("explode");

    assert!(index.retrieve(&failing, "explode", 2).await.is_err());
}
