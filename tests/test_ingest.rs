mod common;

use common::{setup, setup_with, MockCatalog, MockGenerator, MockVectorStore};
use ragkit::domain::error::DomainError;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_ingest_stores_then_analyzes() {
    let generator = MockGenerator::with_responses(&["document analysis"]);
    let t = setup_with(MockVectorStore::default(), generator, MockCatalog::default());
    let metadata = serde_json::json!({"source": "upload"});

    let outcome = t
        .kit
        .ingest_document("the document body", Some(metadata.clone()), "documents")
        .await
        .unwrap();

    assert_eq!(outcome.analysis, "document analysis");
    assert_eq!(outcome.stored_in_collection, "documents");
    assert_eq!(outcome.metadata, Some(metadata.clone()));

    let adds = t.vector_store.adds.lock().unwrap();
    assert_eq!(adds.len(), 1);
    assert_eq!(adds[0].collection, "documents");
    assert_eq!(adds[0].documents, vec!["the document body"]);
    assert_eq!(adds[0].metadatas, Some(vec![metadata]));
    assert_eq!(adds[0].ids, None);

    let prompt = t.generator.last_prompt();
    assert!(prompt.contains("Main topics and themes"));
    assert!(prompt.contains("Document:\nthe document body"));
}

#[tokio::test]
async fn test_storage_failure_skips_analysis() {
    let t = setup();
    // Every attempt fails transiently, so retries exhaust.
    t.vector_store.fail_adds.store(u32::MAX, Ordering::SeqCst);

    let err = t
        .kit
        .ingest_document("doc", None, "documents")
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::RetriesExhausted { .. }));
    // The add was retried to the attempt ceiling.
    assert_eq!(t.vector_store.adds.lock().unwrap().len(), 3);
    // No partial success: an unstored document is never analyzed.
    assert_eq!(t.generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_transient_storage_failure_recovers() {
    let generator = MockGenerator::with_responses(&["analysis"]);
    let t = setup_with(MockVectorStore::default(), generator, MockCatalog::default());
    t.vector_store.fail_adds.store(2, Ordering::SeqCst);

    let outcome = t.kit.ingest_document("doc", None, "documents").await.unwrap();

    assert_eq!(outcome.analysis, "analysis");
    assert_eq!(t.vector_store.adds.lock().unwrap().len(), 3);
}
