use crate::infrastructure::retry::RetryPolicy;
use std::time::Duration;

/// Runtime configuration, read once at startup from `RAGKIT_*` environment
/// variables. Everything has a local-development default except the
/// credentials, which default to empty and fail at the upstream instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub vector_store_url: String,
    pub anthropic_api_key: String,
    pub generation_model: Option<String>,
    pub catalog_url: String,
    pub catalog_credential: String,
    pub catalog_partner_tag: String,
    pub redis_url: String,
    pub retry: RetryPolicy,
    pub rate_limit: u64,
    pub rate_window: Duration,
    pub default_n_results: usize,
    pub default_n_context: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vector_store_url: "http://127.0.0.1:8000".into(),
            anthropic_api_key: String::new(),
            generation_model: None,
            catalog_url: "http://127.0.0.1:8100".into(),
            catalog_credential: String::new(),
            catalog_partner_tag: String::new(),
            redis_url: "redis://127.0.0.1:6379".into(),
            retry: RetryPolicy::default(),
            rate_limit: 60,
            rate_window: Duration::from_secs(60),
            default_n_results: 5,
            default_n_context: 3,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            vector_store_url: env_or("RAGKIT_VECTOR_STORE_URL", defaults.vector_store_url),
            anthropic_api_key: env_or("RAGKIT_ANTHROPIC_API_KEY", defaults.anthropic_api_key),
            generation_model: std::env::var("RAGKIT_GENERATION_MODEL").ok(),
            catalog_url: env_or("RAGKIT_CATALOG_URL", defaults.catalog_url),
            catalog_credential: env_or("RAGKIT_CATALOG_CREDENTIAL", defaults.catalog_credential),
            catalog_partner_tag: env_or("RAGKIT_CATALOG_PARTNER_TAG", defaults.catalog_partner_tag),
            redis_url: env_or("RAGKIT_REDIS_URL", defaults.redis_url),
            retry: RetryPolicy {
                max_attempts: env_parse("RAGKIT_RETRY_MAX_ATTEMPTS", defaults.retry.max_attempts),
                base_delay_ms: env_parse("RAGKIT_RETRY_BASE_DELAY_MS", defaults.retry.base_delay_ms),
                max_delay_ms: env_parse("RAGKIT_RETRY_MAX_DELAY_MS", defaults.retry.max_delay_ms),
                jitter: env_parse("RAGKIT_RETRY_JITTER", defaults.retry.jitter),
            },
            rate_limit: env_parse("RAGKIT_RATE_LIMIT", defaults.rate_limit),
            rate_window: Duration::from_secs(env_parse(
                "RAGKIT_RATE_WINDOW_SECS",
                defaults.rate_window.as_secs(),
            )),
            default_n_results: env_parse("RAGKIT_DEFAULT_N_RESULTS", defaults.default_n_results),
            default_n_context: env_parse("RAGKIT_DEFAULT_N_CONTEXT", defaults.default_n_context),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
