use crate::domain::entities::collection::CollectionInfo;
use crate::domain::entities::query_result::QueryResult;
use crate::domain::error::DomainError;
use crate::domain::ports::vector_store::VectorStore;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// REST client for a Chroma-style vector store.
///
/// One instance per process: the facade constructs it once at startup and
/// shares it via `Arc` through the call graph.
pub struct ChromaClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct CreateCollectionRequest<'a> {
    name: &'a str,
    metadata: Value,
    get_or_create: bool,
}

#[derive(Deserialize)]
struct CollectionResponse {
    name: String,
    #[serde(default)]
    metadata: Value,
    #[serde(default)]
    count: usize,
}

#[derive(Serialize)]
struct AddDocumentsRequest {
    ids: Vec<String>,
    documents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadatas: Option<Vec<Value>>,
}

#[derive(Serialize)]
struct QueryRequest {
    query_texts: Vec<String>,
    n_results: usize,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    where_filter: Option<Value>,
}

#[derive(Deserialize)]
struct QueryResponse {
    ids: Vec<Vec<String>>,
    documents: Vec<Vec<String>>,
    metadatas: Vec<Vec<Value>>,
    distances: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct ListCollectionsResponse {
    collections: Vec<CollectionResponse>,
}

impl ChromaClient {
    pub fn new(base_url: &str) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("ragkit/0.1")
            .build()
            .map_err(|e| DomainError::Unavailable(format!("vector store client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the client and verifies the server is reachable. A connection
    /// failure here is a startup error, not something to swallow.
    pub async fn connect(base_url: &str) -> Result<Self, DomainError> {
        let this = Self::new(base_url)?;
        this.client
            .get(format!("{}/api/v1/heartbeat", this.base_url))
            .send()
            .await
            .map_err(|e| DomainError::Unavailable(format!("vector store unreachable: {e}")))?
            .error_for_status()
            .map_err(|e| DomainError::Unavailable(format!("vector store heartbeat: {e}")))?;
        info!(url = %this.base_url, "connected to vector store");
        Ok(this)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    async fn error_for(resp: reqwest::Response, what: &str) -> DomainError {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            DomainError::NotFound(format!("{what}: {body}"))
        } else if status.is_server_error() {
            DomainError::Unavailable(format!("{what}: {status}: {body}"))
        } else {
            DomainError::InvalidInput(format!("{what}: {status}: {body}"))
        }
    }
}

/// Sequential string ids assigned when the caller omits them.
pub(crate) fn default_ids(n: usize) -> Vec<String> {
    (0..n).map(|i| i.to_string()).collect()
}

pub(crate) fn validate_batch(
    documents: &[String],
    metadatas: Option<&[Value]>,
    ids: Option<&[String]>,
) -> Result<(), DomainError> {
    if documents.is_empty() {
        return Err(DomainError::InvalidInput("no documents provided".into()));
    }
    if let Some(metadatas) = metadatas {
        if metadatas.len() != documents.len() {
            return Err(DomainError::InvalidInput(format!(
                "metadatas length {} does not match documents length {}",
                metadatas.len(),
                documents.len()
            )));
        }
    }
    if let Some(ids) = ids {
        if ids.len() != documents.len() {
            return Err(DomainError::InvalidInput(format!(
                "ids length {} does not match documents length {}",
                ids.len(),
                documents.len()
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl VectorStore for ChromaClient {
    async fn get_or_create_collection(
        &self,
        name: &str,
        metadata: Option<Value>,
    ) -> Result<CollectionInfo, DomainError> {
        let resp = self
            .client
            .post(self.url("/collections"))
            .json(&CreateCollectionRequest {
                name,
                metadata: metadata.unwrap_or_else(|| Value::Object(Default::default())),
                get_or_create: true,
            })
            .send()
            .await
            .map_err(|e| DomainError::Unavailable(format!("vector store: {e}")))?;

        if !resp.status().is_success() {
            return Err(Self::error_for(resp, "get_or_create_collection").await);
        }

        let collection: CollectionResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Parse(format!("collection response: {e}")))?;
        debug!(collection = %collection.name, "accessed collection");
        Ok(CollectionInfo {
            name: collection.name,
            metadata: collection.metadata,
            count: collection.count,
        })
    }

    async fn add_documents(
        &self,
        collection: &str,
        documents: Vec<String>,
        metadatas: Option<Vec<Value>>,
        ids: Option<Vec<String>>,
    ) -> Result<(), DomainError> {
        validate_batch(&documents, metadatas.as_deref(), ids.as_deref())?;

        self.get_or_create_collection(collection, None).await?;

        let count = documents.len();
        let body = AddDocumentsRequest {
            ids: ids.unwrap_or_else(|| default_ids(count)),
            documents,
            metadatas,
        };
        let resp = self
            .client
            .post(self.url(&format!("/collections/{collection}/add")))
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Unavailable(format!("vector store: {e}")))?;

        if !resp.status().is_success() {
            return Err(Self::error_for(resp, "add_documents").await);
        }
        info!(collection, count, "added documents");
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        query_texts: Vec<String>,
        n_results: usize,
        where_filter: Option<Value>,
    ) -> Result<QueryResult, DomainError> {
        if n_results == 0 {
            return Err(DomainError::InvalidInput("n_results must be >= 1".into()));
        }
        if query_texts.is_empty() {
            return Err(DomainError::InvalidInput("no query texts provided".into()));
        }

        self.get_or_create_collection(collection, None).await?;

        let resp = self
            .client
            .post(self.url(&format!("/collections/{collection}/query")))
            .json(&QueryRequest {
                query_texts,
                n_results,
                where_filter,
            })
            .send()
            .await
            .map_err(|e| DomainError::Unavailable(format!("vector store: {e}")))?;

        if !resp.status().is_success() {
            return Err(Self::error_for(resp, "query").await);
        }

        let parsed: QueryResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Parse(format!("query response: {e}")))?;
        let result = QueryResult {
            ids: parsed.ids,
            documents: parsed.documents,
            metadatas: parsed.metadatas,
            distances: parsed.distances,
        };
        // A misaligned result must fail rather than be passed through.
        if !result.is_aligned() {
            return Err(DomainError::Parse(
                "query response sequences are not index-aligned".into(),
            ));
        }
        debug!(collection, "queried collection");
        Ok(result)
    }

    async fn delete_collection(&self, name: &str) -> Result<(), DomainError> {
        let resp = self
            .client
            .delete(self.url(&format!("/collections/{name}")))
            .send()
            .await
            .map_err(|e| DomainError::Unavailable(format!("vector store: {e}")))?;
        if !resp.status().is_success() {
            return Err(Self::error_for(resp, "delete_collection").await);
        }
        Ok(())
    }

    async fn list_collections(&self) -> Result<Vec<String>, DomainError> {
        let resp = self
            .client
            .get(self.url("/collections"))
            .send()
            .await
            .map_err(|e| DomainError::Unavailable(format!("vector store: {e}")))?;
        if !resp.status().is_success() {
            return Err(Self::error_for(resp, "list_collections").await);
        }
        let parsed: ListCollectionsResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Parse(format!("collections response: {e}")))?;
        Ok(parsed.collections.into_iter().map(|c| c.name).collect())
    }

    async fn collection_info(&self, name: &str) -> Result<CollectionInfo, DomainError> {
        self.get_or_create_collection(name, None).await
    }
}
