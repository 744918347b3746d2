use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    #[error("{operation} failed after {attempts} attempts: {cause}")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        cause: String,
    },

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Too many requests, retry after {}s", retry_after.as_secs())]
    RateLimited { retry_after: Duration },
}

impl DomainError {
    /// Transient failures are the only ones the retry wrapper re-attempts.
    /// Everything else is a caller or semantic error and propagates as-is.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Unavailable(_))
    }
}
