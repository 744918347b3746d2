pub mod catalog;
pub mod counter_store;
pub mod generator;
pub mod vector_store;
