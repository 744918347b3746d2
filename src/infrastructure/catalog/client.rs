use crate::domain::entities::catalog_item::{CatalogItem, Price};
use crate::domain::error::DomainError;
use crate::domain::ports::catalog::Catalog;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const SEARCH_RESOURCES: &[&str] = &[
    "ItemInfo.Title",
    "Offers.Listings.Price",
    "Images.Primary.Large",
];

const DETAIL_RESOURCES: &[&str] = &[
    "ItemInfo.Title",
    "ItemInfo.Features",
    "Offers.Listings.Price",
    "Images.Primary.Large",
    "Images.Variants.Large",
];

/// Client for a Product-Advertising-style catalog API. Upstream items come
/// back deeply nested; everything is flattened to `CatalogItem` before it
/// leaves this module.
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    credential: String,
    partner_tag: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SearchItemsRequest<'a> {
    keywords: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_index: Option<&'a str>,
    item_count: usize,
    partner_tag: &'a str,
    partner_type: &'static str,
    resources: &'a [&'a str],
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct GetItemsRequest<'a> {
    item_ids: Vec<&'a str>,
    partner_tag: &'a str,
    partner_type: &'static str,
    resources: &'a [&'a str],
}

#[derive(Deserialize, Default)]
struct ItemsEnvelope {
    #[serde(rename = "ItemsResult")]
    items_result: Option<ItemsResult>,
}

#[derive(Deserialize, Default)]
struct ItemsResult {
    #[serde(rename = "Items", default)]
    items: Vec<UpstreamItem>,
}

#[derive(Deserialize)]
struct UpstreamItem {
    #[serde(rename = "ASIN", default)]
    asin: String,
    #[serde(rename = "DetailPageURL", default)]
    detail_page_url: String,
    #[serde(rename = "ItemInfo", default)]
    item_info: ItemInfo,
    #[serde(rename = "Images", default)]
    images: Images,
    #[serde(rename = "Offers")]
    offers: Option<Offers>,
}

#[derive(Deserialize, Default)]
struct ItemInfo {
    #[serde(rename = "Title")]
    title: Option<DisplayValue>,
    #[serde(rename = "Features")]
    features: Option<DisplayValues>,
}

#[derive(Deserialize)]
struct DisplayValue {
    #[serde(rename = "DisplayValue", default)]
    display_value: String,
}

#[derive(Deserialize)]
struct DisplayValues {
    #[serde(rename = "DisplayValues", default)]
    display_values: Vec<String>,
}

#[derive(Deserialize, Default)]
struct Images {
    #[serde(rename = "Primary")]
    primary: Option<ImageSet>,
    #[serde(rename = "Variants", default)]
    variants: Vec<ImageSet>,
}

#[derive(Deserialize)]
struct ImageSet {
    #[serde(rename = "Large")]
    large: Option<ImageUrl>,
}

#[derive(Deserialize)]
struct ImageUrl {
    #[serde(rename = "URL", default)]
    url: String,
}

#[derive(Deserialize)]
struct Offers {
    #[serde(rename = "Listings", default)]
    listings: Vec<Listing>,
}

#[derive(Deserialize)]
struct Listing {
    #[serde(rename = "Price")]
    price: Option<UpstreamPrice>,
}

#[derive(Deserialize)]
struct UpstreamPrice {
    #[serde(rename = "Amount", default)]
    amount: f64,
    #[serde(rename = "Currency", default = "default_currency")]
    currency: String,
}

fn default_currency() -> String {
    "USD".into()
}

fn flatten_item(item: UpstreamItem, detailed: bool) -> CatalogItem {
    let price = item
        .offers
        .and_then(|offers| offers.listings.into_iter().next())
        .and_then(|listing| listing.price)
        .map(|p| Price {
            amount: p.amount,
            currency: p.currency,
        });

    let (features, variant_images) = if detailed {
        (
            item.item_info
                .features
                .map(|f| f.display_values)
                .unwrap_or_default(),
            item.images
                .variants
                .into_iter()
                .filter_map(|set| set.large.map(|img| img.url))
                .collect(),
        )
    } else {
        (Vec::new(), Vec::new())
    };

    CatalogItem {
        id: item.asin,
        title: item
            .item_info
            .title
            .map(|t| t.display_value)
            .unwrap_or_default(),
        url: item.detail_page_url,
        image_url: item
            .images
            .primary
            .and_then(|set| set.large.map(|img| img.url))
            .unwrap_or_default(),
        price,
        features,
        variant_images,
    }
}

impl CatalogClient {
    pub fn new(
        base_url: &str,
        credential: String,
        partner_tag: String,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("ragkit/0.1")
            .build()
            .map_err(|e| DomainError::Unavailable(format!("catalog client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credential,
            partner_tag,
        })
    }

    async fn post_items<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ItemsEnvelope, DomainError> {
        let resp = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.credential)
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::Unavailable(format!("catalog: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            if status.is_server_error() {
                return Err(DomainError::Unavailable(format!(
                    "catalog {status}: {text}"
                )));
            }
            return Err(DomainError::InvalidInput(format!(
                "catalog {status}: {text}"
            )));
        }

        resp.json()
            .await
            .map_err(|e| DomainError::Parse(format!("catalog response: {e}")))
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn search_items(
        &self,
        keywords: &str,
        category: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<CatalogItem>, DomainError> {
        let envelope = self
            .post_items(
                "/searchitems",
                &SearchItemsRequest {
                    keywords,
                    search_index: category,
                    item_count: max_results,
                    partner_tag: &self.partner_tag,
                    partner_type: "Associates",
                    resources: SEARCH_RESOURCES,
                },
            )
            .await?;

        let items = match envelope.items_result {
            Some(result) => result.items,
            None => return Ok(Vec::new()),
        };
        debug!(keywords, found = items.len(), "searched catalog");
        Ok(items
            .into_iter()
            .take(max_results)
            .map(|item| flatten_item(item, false))
            .collect())
    }

    async fn item_details(&self, id: &str) -> Result<CatalogItem, DomainError> {
        let envelope = self
            .post_items(
                "/getitems",
                &GetItemsRequest {
                    item_ids: vec![id],
                    partner_tag: &self.partner_tag,
                    partner_type: "Associates",
                    resources: DETAIL_RESOURCES,
                },
            )
            .await?;

        let item = envelope
            .items_result
            .and_then(|result| result.items.into_iter().next())
            .ok_or_else(|| DomainError::NotFound(format!("item {id} not found")))?;
        Ok(flatten_item(item, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> UpstreamItem {
        serde_json::from_value(serde_json::json!({
            "ASIN": "B0TESTASIN",
            "DetailPageURL": "https://example.com/dp/B0TESTASIN",
            "ItemInfo": {
                "Title": { "DisplayValue": "Trail Running Shoes" },
                "Features": { "DisplayValues": ["Breathable mesh", "Rock plate"] }
            },
            "Images": {
                "Primary": { "Large": { "URL": "https://img.example.com/main.jpg" } },
                "Variants": [
                    { "Large": { "URL": "https://img.example.com/side.jpg" } },
                    { "Small": { "URL": "https://img.example.com/tiny.jpg" } }
                ]
            },
            "Offers": {
                "Listings": [ { "Price": { "Amount": 89.99, "Currency": "USD" } } ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_flatten_basic_fields() {
        let item = flatten_item(sample_item(), false);
        assert_eq!(item.id, "B0TESTASIN");
        assert_eq!(item.title, "Trail Running Shoes");
        assert_eq!(item.image_url, "https://img.example.com/main.jpg");
        assert_eq!(item.price.as_ref().unwrap().amount, 89.99);
        assert!(item.features.is_empty());
        assert!(item.variant_images.is_empty());
    }

    #[test]
    fn test_flatten_detailed_fields() {
        let item = flatten_item(sample_item(), true);
        assert_eq!(item.features, vec!["Breathable mesh", "Rock plate"]);
        // Variant without a Large image is skipped, not nulled.
        assert_eq!(item.variant_images, vec!["https://img.example.com/side.jpg"]);
    }

    #[test]
    fn test_flatten_defaults_missing_fields() {
        let item: UpstreamItem = serde_json::from_value(serde_json::json!({
            "ASIN": "B0BARE"
        }))
        .unwrap();
        let flat = flatten_item(item, true);
        assert_eq!(flat.id, "B0BARE");
        assert_eq!(flat.title, "");
        assert_eq!(flat.url, "");
        assert_eq!(flat.image_url, "");
        assert!(flat.price.is_none());
        assert!(flat.features.is_empty());
    }

    #[test]
    fn test_missing_items_result_parses_empty() {
        let envelope: ItemsEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.items_result.is_none());
    }
}
