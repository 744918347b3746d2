use crate::domain::error::DomainError;
use crate::domain::ports::generator::TextGenerator;
use crate::domain::ports::vector_store::VectorStore;
use crate::infrastructure::retry::{with_retry, RetryPolicy};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

const ANALYSIS_INSTRUCTION: &str = "Provide a comprehensive analysis of this document, including:\n\
     1. Main topics and themes\n\
     2. Key insights\n\
     3. Potential applications or recommendations";

const ANALYZE_MAX_TOKENS: u32 = 2000;

#[derive(Debug, Serialize)]
pub struct IngestOutcome {
    pub stored_at: DateTime<Utc>,
    pub analysis: String,
    pub stored_in_collection: String,
    pub metadata: Option<serde_json::Value>,
}

/// Stores a document and analyzes it. Storage comes first: if it fails the
/// whole operation fails, so an unstored document is never analyzed.
pub struct IngestUseCase {
    vector_store: Arc<dyn VectorStore>,
    generator: Arc<dyn TextGenerator>,
    retry: RetryPolicy,
}

impl IngestUseCase {
    pub fn new(
        vector_store: Arc<dyn VectorStore>,
        generator: Arc<dyn TextGenerator>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            vector_store,
            generator,
            retry,
        }
    }

    pub async fn execute(
        &self,
        document: &str,
        metadata: Option<serde_json::Value>,
        collection_name: &str,
    ) -> Result<IngestOutcome, DomainError> {
        with_retry("vector_store.add_documents", &self.retry, || {
            self.vector_store.add_documents(
                collection_name,
                vec![document.to_string()],
                metadata.clone().map(|m| vec![m]),
                None,
            )
        })
        .await?;

        let analysis = self
            .generator
            .analyze(document, ANALYSIS_INSTRUCTION, ANALYZE_MAX_TOKENS)
            .await?;

        Ok(IngestOutcome {
            stored_at: Utc::now(),
            analysis,
            stored_in_collection: collection_name.to_string(),
            metadata,
        })
    }
}
