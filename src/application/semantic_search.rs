use crate::domain::entities::ranked_result::RankedResult;
use crate::domain::error::DomainError;
use crate::domain::ports::generator::{GenerationOptions, TextGenerator};
use crate::domain::ports::vector_store::VectorStore;
use crate::infrastructure::retry::{with_retry, RetryPolicy};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

/// Semantic search with optional generation-backed reranking.
pub struct SearchUseCase {
    vector_store: Arc<dyn VectorStore>,
    generator: Arc<dyn TextGenerator>,
    retry: RetryPolicy,
}

impl SearchUseCase {
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
        query: &str,
        collection_name: &str,
        n_results: usize,
        rerank: bool,
    ) -> Result<Vec<RankedResult>, DomainError> {
        if n_results == 0 {
            return Err(DomainError::InvalidInput("n_results must be >= 1".into()));
        }

        // Over-fetch candidates when reranking so the reranker has room to
        // reorder beyond the requested page.
        let fetch = if rerank { n_results * 2 } else { n_results };

        let results = with_retry("vector_store.query", &self.retry, || {
            self.vector_store
                .query(collection_name, vec![query.to_string()], fetch, None)
        })
        .await?;

        let documents = results.documents.into_iter().next().unwrap_or_default();
        let metadatas = results.metadatas.into_iter().next().unwrap_or_default();
        let distances = results.distances.into_iter().next().unwrap_or_default();

        if !rerank {
            let ranked = documents
                .into_iter()
                .zip(metadatas)
                .zip(distances)
                .map(|((document, metadata), distance)| RankedResult {
                    document,
                    metadata,
                    // Distance is dissimilarity; flip it into a score.
                    score: 1.0 - distance,
                    explanation: None,
                })
                .take(n_results)
                .collect();
            return Ok(ranked);
        }

        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let numbered = documents
            .iter()
            .enumerate()
            .map(|(i, doc)| format!("{}. {doc}", i + 1))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "Rate each document's relevance to the query on a scale of 0-100.\n\
             Respond with one line per document in the form: index|score|explanation\n\
             Echo the document's index exactly as given and keep each explanation to one line.\n\n\
             Query: {query}\n\n\
             Documents to rate:\n{numbered}"
        );
        let rankings = self
            .generator
            .generate(&prompt, GenerationOptions::default())
            .await?;

        // Lines are paired to candidates by the echoed index, never by
        // position, so a short or over-long response cannot misalign the
        // rest of the list. Unparseable lines are dropped, not fatal.
        let mut seen = HashSet::new();
        let mut entries: Vec<(usize, f64, String)> = Vec::new();
        for line in rankings.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_rerank_line(line, documents.len()) {
                Some((index, score, explanation)) => {
                    if seen.insert(index) {
                        entries.push((index, score, explanation));
                    } else {
                        warn!(index, "duplicate rerank line dropped");
                    }
                }
                None => warn!(line, "failed to parse rerank line"),
            }
        }

        // Stable sort by descending score; pre-sorting by retrieval order
        // makes that order the tie-breaker.
        entries.sort_by_key(|(index, _, _)| *index);
        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        Ok(entries
            .into_iter()
            .take(n_results)
            .map(|(index, score, explanation)| RankedResult {
                document: documents[index].clone(),
                metadata: metadatas[index].clone(),
                score: score / 100.0,
                explanation: Some(explanation),
            })
            .collect())
    }
}

/// Parses one `index|score|explanation` line. Returns the zero-based
/// candidate index, the raw 0-100 score, and the explanation, or `None`
/// when the line is malformed or the index is out of range.
pub(crate) fn parse_rerank_line(line: &str, candidates: usize) -> Option<(usize, f64, String)> {
    let mut parts = line.splitn(3, '|');
    let index: usize = parts.next()?.trim().parse().ok()?;
    let score: f64 = parts.next()?.trim().parse().ok()?;
    let explanation = parts.next()?.trim().to_string();
    if index == 0 || index > candidates || !score.is_finite() {
        return None;
    }
    Some((index - 1, score.clamp(0.0, 100.0), explanation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_line() {
        let parsed = parse_rerank_line("2|85|directly answers the query", 3);
        assert_eq!(
            parsed,
            Some((1, 85.0, "directly answers the query".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        assert_eq!(parse_rerank_line("oops", 3), None);
        assert_eq!(parse_rerank_line("1|50", 3), None);
    }

    #[test]
    fn test_parse_rejects_non_numeric_score() {
        assert_eq!(parse_rerank_line("1|high|looks good", 3), None);
    }

    #[test]
    fn test_parse_rejects_out_of_range_index() {
        assert_eq!(parse_rerank_line("0|50|zero-based", 3), None);
        assert_eq!(parse_rerank_line("4|50|past the end", 3), None);
    }

    #[test]
    fn test_parse_clamps_score() {
        let parsed = parse_rerank_line("1|150|overshoot", 3).unwrap();
        assert_eq!(parsed.1, 100.0);
    }

    #[test]
    fn test_parse_keeps_pipes_in_explanation() {
        let parsed = parse_rerank_line("1|50|mentions a|b syntax", 3).unwrap();
        assert_eq!(parsed.2, "mentions a|b syntax");
    }
}
