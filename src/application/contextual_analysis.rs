use crate::domain::error::DomainError;
use crate::domain::ports::generator::TextGenerator;
use crate::domain::ports::vector_store::VectorStore;
use crate::infrastructure::retry::{with_retry, RetryPolicy};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

const ANALYZE_MAX_TOKENS: u32 = 2000;

#[derive(Debug, Serialize)]
pub struct ContextualAnalysis {
    pub analysis: String,
    pub context_used: Vec<String>,
    pub context_metadata: Vec<serde_json::Value>,
}

/// Analyzes text with nearest-document context pulled from a collection.
pub struct AnalysisUseCase {
    vector_store: Arc<dyn VectorStore>,
    generator: Arc<dyn TextGenerator>,
    retry: RetryPolicy,
}

impl AnalysisUseCase {
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
        text: &str,
        context_collection: &str,
        instruction: &str,
        n_context: usize,
    ) -> Result<ContextualAnalysis, DomainError> {
        let results = with_retry("vector_store.query", &self.retry, || {
            self.vector_store.query(
                context_collection,
                vec![text.to_string()],
                n_context,
                None,
            )
        })
        .await?;

        let documents = results.documents.into_iter().next().unwrap_or_default();
        let metadata = results.metadatas.into_iter().next().unwrap_or_default();

        // Degraded mode, not an error: analyze the text on its own and
        // report empty context lists so the caller can tell the difference.
        if documents.is_empty() {
            warn!(collection = context_collection, "no context found, analyzing without context");
            let analysis = self
                .generator
                .analyze(text, instruction, ANALYZE_MAX_TOKENS)
                .await?;
            return Ok(ContextualAnalysis {
                analysis,
                context_used: Vec::new(),
                context_metadata: Vec::new(),
            });
        }

        let context = documents.join("\n\n");
        let analysis = self
            .generator
            .analyze(
                text,
                &format!("Context:\n{context}\n\n{instruction}"),
                ANALYZE_MAX_TOKENS,
            )
            .await?;

        Ok(ContextualAnalysis {
            analysis,
            context_used: documents,
            context_metadata: metadata,
        })
    }
}
