use crate::domain::error::DomainError;
use crate::domain::ports::counter_store::{Admission, CounterStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

struct Bucket {
    count: u64,
    expires_at: Instant,
}

/// In-process counter store for tests and single-node deployments.
///
/// The whole check-and-increment runs inside one mutex critical section, so
/// concurrent requests can never all observe a stale count below the limit.
/// Uses `tokio::time::Instant` so paused-clock tests can drive expiry.
#[derive(Default)]
pub struct MemoryCounterStore {
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn incr_within_limit(
        &self,
        key: &str,
        limit: u64,
        window: Duration,
    ) -> Result<Admission, DomainError> {
        let now = Instant::now();
        let mut buckets = self
            .buckets
            .lock()
            .map_err(|e| DomainError::Unavailable(format!("counter store: {e}")))?;

        buckets.retain(|_, bucket| bucket.expires_at > now);

        match buckets.get_mut(key) {
            Some(bucket) => {
                if bucket.count >= limit {
                    return Ok(Admission::Limited {
                        retry_after: bucket.expires_at - now,
                    });
                }
                bucket.count += 1;
                Ok(Admission::Allowed {
                    count: bucket.count,
                })
            }
            None => {
                buckets.insert(
                    key.to_string(),
                    Bucket {
                        count: 1,
                        expires_at: now + window,
                    },
                );
                Ok(Admission::Allowed { count: 1 })
            }
        }
    }
}
