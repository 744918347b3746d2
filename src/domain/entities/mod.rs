pub mod catalog_item;
pub mod chat_message;
pub mod collection;
pub mod query_result;
pub mod ranked_result;
