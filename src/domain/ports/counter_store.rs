use crate::domain::error::DomainError;
use async_trait::async_trait;
use std::time::Duration;

/// Outcome of one admission attempt against a rate bucket.
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    Allowed { count: u64 },
    Limited { retry_after: Duration },
}

/// Shared counter store backing the admission controller.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increment the counter for `key` unless its count has
    /// already reached `limit` within the current window. A first request
    /// creates the bucket with count 1 and a TTL of `window`; a rejected
    /// request must NOT increment and reports the remaining window.
    ///
    /// The check and the increment are one atomic step. A read-then-write
    /// pair would let concurrent requests all observe a stale count below
    /// the limit and all proceed.
    async fn incr_within_limit(
        &self,
        key: &str,
        limit: u64,
        window: Duration,
    ) -> Result<Admission, DomainError>;
}
