use crate::domain::error::DomainError;
use crate::domain::ports::counter_store::{Admission, CounterStore};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::Script;
use std::time::Duration;
use tracing::info;

/// Check-then-increment as one server-side script. Rejection at the limit
/// does not increment, so a bucket's count can never exceed the limit; the
/// key expires with the window and PTTL reports the remaining duration.
const INCR_WITHIN_LIMIT: &str = r#"
local current = tonumber(redis.call('GET', KEYS[1]) or '0')
local limit = tonumber(ARGV[1])
if current >= limit then
  local ttl = redis.call('PTTL', KEYS[1])
  if ttl < 0 then ttl = tonumber(ARGV[2]) end
  return {0, ttl}
end
local count = redis.call('INCR', KEYS[1])
if count == 1 then
  redis.call('PEXPIRE', KEYS[1], ARGV[2])
end
return {1, count}
"#;

/// Redis-backed counter store shared across processes.
pub struct RedisCounterStore {
    conn: ConnectionManager,
    script: Script,
}

impl RedisCounterStore {
    /// Connects and verifies the server with a PING. The ConnectionManager
    /// reconnects on its own after transient drops.
    pub async fn connect(url: &str) -> Result<Self, DomainError> {
        let client = redis::Client::open(url)
            .map_err(|e| DomainError::Unavailable(format!("redis: {e}")))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::Unavailable(format!("redis: {e}")))?;

        let mut conn = manager.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::Unavailable(format!("redis ping: {e}")))?;
        info!(url, "connected to counter store");

        Ok(Self {
            conn: manager,
            script: Script::new(INCR_WITHIN_LIMIT),
        })
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn incr_within_limit(
        &self,
        key: &str,
        limit: u64,
        window: Duration,
    ) -> Result<Admission, DomainError> {
        let mut conn = self.conn.clone();
        let (allowed, value): (i64, i64) = self
            .script
            .key(key)
            .arg(limit)
            .arg(window.as_millis() as u64)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| DomainError::Unavailable(format!("counter store: {e}")))?;

        if allowed == 1 {
            Ok(Admission::Allowed {
                count: value as u64,
            })
        } else {
            Ok(Admission::Limited {
                retry_after: Duration::from_millis(value.max(0) as u64),
            })
        }
    }
}
