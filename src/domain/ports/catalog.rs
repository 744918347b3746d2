use crate::domain::entities::catalog_item::CatalogItem;
use crate::domain::error::DomainError;
use async_trait::async_trait;

/// Product catalog capability.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Keyword search. An empty upstream result set is an empty list, not
    /// an error.
    async fn search_items(
        &self,
        keywords: &str,
        category: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<CatalogItem>, DomainError>;

    /// Detailed lookup by item id. Fails with `NotFound` when the id does
    /// not resolve.
    async fn item_details(&self, id: &str) -> Result<CatalogItem, DomainError>;
}
