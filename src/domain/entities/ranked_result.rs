use serde::{Deserialize, Serialize};

/// A search hit with a normalized relevance score in [0, 1]. The
/// explanation is present only on the rerank path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub document: String,
    pub metadata: serde_json::Value,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}
