use crate::domain::error::DomainError;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Backoff discipline for flaky external calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempt ceiling, including the initial call.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Randomize each delay to 50-100% of its value to avoid thundering herd.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 10_000,
            jitter: true,
        }
    }
}

/// Runs `f`, retrying transient failures with exponential backoff.
///
/// Permanent failures (validation, not-found, malformed input) propagate
/// immediately and unchanged. When the attempt ceiling is exhausted the last
/// error is wrapped with the operation name and root cause.
pub async fn with_retry<F, Fut, T>(
    operation: &str,
    policy: &RetryPolicy,
    mut f: F,
) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let started = Instant::now();
    let mut delay = policy.base_delay_ms;
    let mut attempt: u32 = 1;

    loop {
        match f().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(
                        operation,
                        attempt,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "operation succeeded after retries"
                    );
                }
                return Ok(value);
            }
            Err(e) if e.is_transient() => {
                if attempt >= policy.max_attempts {
                    warn!(
                        operation,
                        attempt,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "giving up: {e}"
                    );
                    return Err(DomainError::RetriesExhausted {
                        operation: operation.to_string(),
                        attempts: attempt,
                        cause: e.to_string(),
                    });
                }

                let wait = if policy.jitter { apply_jitter(delay) } else { delay };
                warn!(
                    operation,
                    attempt,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "transient failure: {e}; retrying in {wait}ms"
                );
                tokio::time::sleep(Duration::from_millis(wait)).await;

                delay = (delay.saturating_mul(2)).min(policy.max_delay_ms);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// 50-100% of the original delay, seeded from the wall clock.
fn apply_jitter(delay: u64) -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let factor =
        (RandomState::new().hash_one(std::time::SystemTime::now()) % 50) as f64 / 100.0 + 0.5;
    (delay as f64 * factor) as u64
}
