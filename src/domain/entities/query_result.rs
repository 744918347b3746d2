use serde::{Deserialize, Serialize};

/// Similarity-query result: one inner vector per query text, all four
/// sequences index-aligned. Distances are dissimilarity scores (smaller =
/// more similar) in store order (ascending distance).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResult {
    pub ids: Vec<Vec<String>>,
    pub documents: Vec<Vec<String>>,
    pub metadatas: Vec<Vec<serde_json::Value>>,
    pub distances: Vec<Vec<f64>>,
}

impl QueryResult {
    /// Checks the alignment invariant. A misaligned result must never be
    /// handed to a caller; the store client fails the operation instead.
    pub fn is_aligned(&self) -> bool {
        let n = self.documents.len();
        if self.ids.len() != n || self.metadatas.len() != n || self.distances.len() != n {
            return false;
        }
        (0..n).all(|i| {
            let len = self.documents[i].len();
            self.ids[i].len() == len
                && self.metadatas[i].len() == len
                && self.distances[i].len() == len
        })
    }
}
