pub mod contextual_analysis;
pub mod ingest;
pub mod rate_limit;
pub mod recommend;
pub mod semantic_search;
