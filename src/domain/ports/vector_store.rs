use crate::domain::entities::collection::CollectionInfo;
use crate::domain::entities::query_result::QueryResult;
use crate::domain::error::DomainError;
use async_trait::async_trait;
use serde_json::Value;

/// Vector store capability: named collections of embedded documents.
/// The process holds exactly one implementation instance, shared via `Arc`.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Idempotent get-or-create. Collections are never implicitly deleted.
    async fn get_or_create_collection(
        &self,
        name: &str,
        metadata: Option<Value>,
    ) -> Result<CollectionInfo, DomainError>;

    /// Adds documents to a collection. Fails with `InvalidInput` when
    /// `documents` is empty or `metadatas`/`ids` lengths mismatch. Omitted
    /// ids are assigned sequentially as `"0".."n-1"`.
    async fn add_documents(
        &self,
        collection: &str,
        documents: Vec<String>,
        metadatas: Option<Vec<Value>>,
        ids: Option<Vec<String>>,
    ) -> Result<(), DomainError>;

    /// Nearest-document query, one result set per query text. `where_filter`
    /// is an opaque equality/range filter passed through unmodified.
    async fn query(
        &self,
        collection: &str,
        query_texts: Vec<String>,
        n_results: usize,
        where_filter: Option<Value>,
    ) -> Result<QueryResult, DomainError>;

    async fn delete_collection(&self, name: &str) -> Result<(), DomainError>;

    async fn list_collections(&self) -> Result<Vec<String>, DomainError>;

    async fn collection_info(&self, name: &str) -> Result<CollectionInfo, DomainError>;
}
