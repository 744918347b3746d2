//! Shared test helpers: mock ports injected through `RagKit::with_clients`.
#![allow(dead_code)]

use async_trait::async_trait;
use ragkit::config::Config;
use ragkit::domain::entities::catalog_item::CatalogItem;
use ragkit::domain::entities::chat_message::ChatMessage;
use ragkit::domain::entities::collection::CollectionInfo;
use ragkit::domain::entities::query_result::QueryResult;
use ragkit::domain::error::DomainError;
use ragkit::domain::ports::catalog::Catalog;
use ragkit::domain::ports::generator::{GenerationOptions, TextGenerator};
use ragkit::domain::ports::vector_store::VectorStore;
use ragkit::infrastructure::memory::counter_store::MemoryCounterStore;
use ragkit::infrastructure::retry::RetryPolicy;
use ragkit::RagKit;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct QueryCall {
    pub collection: String,
    pub texts: Vec<String>,
    pub n_results: usize,
}

#[derive(Debug, Clone)]
pub struct AddCall {
    pub collection: String,
    pub documents: Vec<String>,
    pub metadatas: Option<Vec<Value>>,
    pub ids: Option<Vec<String>>,
}

#[derive(Default)]
pub struct MockVectorStore {
    pub query_result: Mutex<QueryResult>,
    pub queries: Mutex<Vec<QueryCall>>,
    pub adds: Mutex<Vec<AddCall>>,
    /// Remaining `add_documents` calls that fail with a transient error.
    pub fail_adds: AtomicU32,
}

#[async_trait]
impl VectorStore for MockVectorStore {
    async fn get_or_create_collection(
        &self,
        name: &str,
        metadata: Option<Value>,
    ) -> Result<CollectionInfo, DomainError> {
        Ok(CollectionInfo {
            name: name.to_string(),
            metadata: metadata.unwrap_or_else(|| serde_json::json!({})),
            count: 0,
        })
    }

    async fn add_documents(
        &self,
        collection: &str,
        documents: Vec<String>,
        metadatas: Option<Vec<Value>>,
        ids: Option<Vec<String>>,
    ) -> Result<(), DomainError> {
        self.adds.lock().unwrap().push(AddCall {
            collection: collection.to_string(),
            documents,
            metadatas,
            ids,
        });
        if self.fail_adds.load(Ordering::SeqCst) > 0 {
            self.fail_adds.fetch_sub(1, Ordering::SeqCst);
            return Err(DomainError::Unavailable("store down".into()));
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        query_texts: Vec<String>,
        n_results: usize,
        _where_filter: Option<Value>,
    ) -> Result<QueryResult, DomainError> {
        self.queries.lock().unwrap().push(QueryCall {
            collection: collection.to_string(),
            texts: query_texts,
            n_results,
        });
        Ok(self.query_result.lock().unwrap().clone())
    }

    async fn delete_collection(&self, _name: &str) -> Result<(), DomainError> {
        Ok(())
    }

    async fn list_collections(&self) -> Result<Vec<String>, DomainError> {
        Ok(Vec::new())
    }

    async fn collection_info(&self, name: &str) -> Result<CollectionInfo, DomainError> {
        self.get_or_create_collection(name, None).await
    }
}

#[derive(Default)]
pub struct MockGenerator {
    /// Queued responses, popped per call; defaults to "mock response".
    pub responses: Mutex<VecDeque<String>>,
    pub requests: Mutex<Vec<(Vec<ChatMessage>, GenerationOptions)>>,
    pub calls: AtomicU32,
}

impl MockGenerator {
    pub fn with_responses(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        }
    }

    /// Content of the last user prompt sent to the generator.
    pub fn last_prompt(&self) -> String {
        let requests = self.requests.lock().unwrap();
        let (messages, _) = requests.last().expect("no generation calls recorded");
        messages.last().map(|m| m.content.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        opts: GenerationOptions,
    ) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((messages, opts));
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string()))
    }
}

#[derive(Default)]
pub struct MockCatalog {
    pub items_by_keyword: Mutex<HashMap<String, Vec<CatalogItem>>>,
    pub searches: Mutex<Vec<String>>,
}

impl MockCatalog {
    pub fn with_items(entries: Vec<(&str, Vec<CatalogItem>)>) -> Self {
        Self {
            items_by_keyword: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            ),
            ..Default::default()
        }
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn search_items(
        &self,
        keywords: &str,
        _category: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<CatalogItem>, DomainError> {
        self.searches.lock().unwrap().push(keywords.to_string());
        let items = self
            .items_by_keyword
            .lock()
            .unwrap()
            .get(keywords)
            .cloned()
            .unwrap_or_default();
        Ok(items.into_iter().take(max_results).collect())
    }

    async fn item_details(&self, id: &str) -> Result<CatalogItem, DomainError> {
        self.items_by_keyword
            .lock()
            .unwrap()
            .values()
            .flatten()
            .find(|item| item.id == id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("item {id} not found")))
    }
}

pub fn test_config() -> Config {
    Config {
        retry: RetryPolicy {
            max_attempts: 3,
            base_delay_ms: 1,
            max_delay_ms: 2,
            jitter: false,
        },
        rate_limit: 5,
        rate_window: Duration::from_secs(60),
        ..Default::default()
    }
}

pub struct TestKit {
    pub kit: RagKit,
    pub vector_store: Arc<MockVectorStore>,
    pub generator: Arc<MockGenerator>,
    pub catalog: Arc<MockCatalog>,
}

pub fn setup_with(
    vector_store: MockVectorStore,
    generator: MockGenerator,
    catalog: MockCatalog,
) -> TestKit {
    let vector_store = Arc::new(vector_store);
    let generator = Arc::new(generator);
    let catalog = Arc::new(catalog);
    let kit = RagKit::with_clients(
        vector_store.clone(),
        generator.clone(),
        catalog.clone(),
        Arc::new(MemoryCounterStore::new()),
        &test_config(),
    );
    TestKit {
        kit,
        vector_store,
        generator,
        catalog,
    }
}

pub fn setup() -> TestKit {
    setup_with(
        MockVectorStore::default(),
        MockGenerator::default(),
        MockCatalog::default(),
    )
}

/// One-query-text result with per-document metadata `{"i": <index>}`.
pub fn query_result(documents: Vec<&str>, distances: Vec<f64>) -> QueryResult {
    assert_eq!(documents.len(), distances.len());
    QueryResult {
        ids: vec![(0..documents.len()).map(|i| i.to_string()).collect()],
        documents: vec![documents.iter().map(|d| d.to_string()).collect()],
        metadatas: vec![(0..documents.len())
            .map(|i| serde_json::json!({ "i": i }))
            .collect()],
        distances: vec![distances],
    }
}

pub fn item(id: &str, title: &str) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        title: title.to_string(),
        url: format!("https://example.com/items/{id}"),
        image_url: String::new(),
        price: None,
        features: vec!["feature one".into()],
        variant_images: Vec::new(),
    }
}
