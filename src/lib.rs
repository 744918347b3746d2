pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::contextual_analysis::{AnalysisUseCase, ContextualAnalysis};
use crate::application::ingest::{IngestOutcome, IngestUseCase};
use crate::application::rate_limit::RateLimiter;
use crate::application::recommend::{RecommendUseCase, RecommendationSet};
use crate::application::semantic_search::SearchUseCase;
use crate::config::Config;
use crate::domain::entities::catalog_item::CatalogItem;
use crate::domain::entities::chat_message::ChatMessage;
use crate::domain::entities::collection::CollectionInfo;
use crate::domain::entities::ranked_result::RankedResult;
use crate::domain::error::DomainError;
use crate::domain::ports::catalog::Catalog;
use crate::domain::ports::counter_store::CounterStore;
use crate::domain::ports::generator::TextGenerator;
use crate::domain::ports::vector_store::VectorStore;
use crate::infrastructure::anthropic::client::ClaudeClient;
use crate::infrastructure::catalog::client::CatalogClient;
use crate::infrastructure::chroma::client::ChromaClient;
use crate::infrastructure::redis::counter_store::RedisCounterStore;
use crate::infrastructure::retry::{with_retry, RetryPolicy};
use std::sync::Arc;

/// Facade over the orchestration core. Constructed once at process start and
/// passed explicitly through the call graph; the vector store client and the
/// counter store are the only state shared between concurrent callers, and
/// both are safe for concurrent use.
pub struct RagKit {
    analysis_uc: AnalysisUseCase,
    recommend_uc: RecommendUseCase,
    ingest_uc: IngestUseCase,
    search_uc: SearchUseCase,
    limiter: RateLimiter,
    vector_store: Arc<dyn VectorStore>,
    generator: Arc<dyn TextGenerator>,
    catalog: Arc<dyn Catalog>,
    retry: RetryPolicy,
}

impl RagKit {
    /// Builds the real clients from configuration. An unreachable vector
    /// store or counter store fails startup here.
    pub async fn new(config: &Config) -> Result<Self, DomainError> {
        let vector_store: Arc<dyn VectorStore> =
            Arc::new(ChromaClient::connect(&config.vector_store_url).await?);
        let generator: Arc<dyn TextGenerator> = Arc::new(ClaudeClient::new(
            config.anthropic_api_key.clone(),
            config.generation_model.clone(),
        )?);
        let catalog: Arc<dyn Catalog> = Arc::new(CatalogClient::new(
            &config.catalog_url,
            config.catalog_credential.clone(),
            config.catalog_partner_tag.clone(),
        )?);
        let counters: Arc<dyn CounterStore> =
            Arc::new(RedisCounterStore::connect(&config.redis_url).await?);

        Ok(Self::with_clients(
            vector_store,
            generator,
            catalog,
            counters,
            config,
        ))
    }

    /// Wires the use cases over injected clients. Tests use this with mock
    /// ports; `new` uses it with the real ones.
    pub fn with_clients(
        vector_store: Arc<dyn VectorStore>,
        generator: Arc<dyn TextGenerator>,
        catalog: Arc<dyn Catalog>,
        counters: Arc<dyn CounterStore>,
        config: &Config,
    ) -> Self {
        Self {
            analysis_uc: AnalysisUseCase::new(
                vector_store.clone(),
                generator.clone(),
                config.retry.clone(),
            ),
            recommend_uc: RecommendUseCase::new(
                generator.clone(),
                catalog.clone(),
                config.retry.clone(),
            ),
            ingest_uc: IngestUseCase::new(
                vector_store.clone(),
                generator.clone(),
                config.retry.clone(),
            ),
            search_uc: SearchUseCase::new(
                vector_store.clone(),
                generator.clone(),
                config.retry.clone(),
            ),
            limiter: RateLimiter::new(counters, config.rate_limit, config.rate_window),
            vector_store,
            generator,
            catalog,
            retry: config.retry.clone(),
        }
    }

    /// Admission check for one caller key. Call before any orchestrator
    /// operation; a `RateLimited` error carries the retry-after duration.
    pub async fn admit(&self, caller_key: &str) -> Result<(), DomainError> {
        self.limiter.check(caller_key).await
    }

    pub async fn analyze_with_context(
        &self,
        text: &str,
        context_collection: &str,
        instruction: &str,
        n_context: usize,
    ) -> Result<ContextualAnalysis, DomainError> {
        self.analysis_uc
            .execute(text, context_collection, instruction, n_context)
            .await
    }

    pub async fn recommend_products(
        &self,
        user_input: &str,
        max_products: usize,
    ) -> Result<RecommendationSet, DomainError> {
        self.recommend_uc.execute(user_input, max_products).await
    }

    pub async fn ingest_document(
        &self,
        document: &str,
        metadata: Option<serde_json::Value>,
        collection_name: &str,
    ) -> Result<IngestOutcome, DomainError> {
        self.ingest_uc
            .execute(document, metadata, collection_name)
            .await
    }

    pub async fn semantic_search(
        &self,
        query: &str,
        collection_name: &str,
        n_results: usize,
        rerank: bool,
    ) -> Result<Vec<RankedResult>, DomainError> {
        self.search_uc
            .execute(query, collection_name, n_results, rerank)
            .await
    }

    pub async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        context: Option<&str>,
        system_prompt: Option<&str>,
    ) -> Result<String, DomainError> {
        self.generator.chat(messages, context, system_prompt).await
    }

    pub async fn item_details(&self, id: &str) -> Result<CatalogItem, DomainError> {
        self.catalog.item_details(id).await
    }

    // Collection introspection.
    pub async fn list_collections(&self) -> Result<Vec<String>, DomainError> {
        self.vector_store.list_collections().await
    }

    pub async fn collection_info(&self, name: &str) -> Result<CollectionInfo, DomainError> {
        with_retry("vector_store.collection_info", &self.retry, || {
            self.vector_store.collection_info(name)
        })
        .await
    }

    pub async fn delete_collection(&self, name: &str) -> Result<(), DomainError> {
        self.vector_store.delete_collection(name).await
    }
}
