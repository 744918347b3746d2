use serde::{Deserialize, Serialize};

/// Introspection view of a named collection in the vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    pub metadata: serde_json::Value,
    pub count: usize,
}
