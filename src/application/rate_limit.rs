use crate::domain::error::DomainError;
use crate::domain::ports::counter_store::{Admission, CounterStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const KEY_PREFIX: &str = "rate_limit";

/// Admission controller: counts requests per caller key within a rolling
/// window and rejects the excess. Independent of the orchestrator; it guards
/// its entry points from the outside.
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    limit: u64,
    window: Duration,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn CounterStore>, limit: u64, window: Duration) -> Self {
        Self {
            store,
            limit,
            window,
        }
    }

    /// Admits or rejects one request for `caller_key`. Rejection is a
    /// "try later" signal carrying the remaining window, not a pipeline
    /// failure.
    pub async fn check(&self, caller_key: &str) -> Result<(), DomainError> {
        let key = format!("{KEY_PREFIX}:{caller_key}");
        match self
            .store
            .incr_within_limit(&key, self.limit, self.window)
            .await?
        {
            Admission::Allowed { count } => {
                debug!(caller_key, count, limit = self.limit, "request admitted");
                Ok(())
            }
            Admission::Limited { retry_after } => Err(DomainError::RateLimited { retry_after }),
        }
    }
}
