pub mod anthropic;
pub mod catalog;
pub mod chroma;
pub mod memory;
pub mod redis;
pub mod retry;
