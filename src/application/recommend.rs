use crate::domain::entities::catalog_item::CatalogItem;
use crate::domain::error::DomainError;
use crate::domain::ports::catalog::Catalog;
use crate::domain::ports::generator::{GenerationOptions, TextGenerator};
use crate::infrastructure::retry::{with_retry, RetryPolicy};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

const RESULTS_PER_KEYWORD: usize = 3;
const RATIONALE_MAX_TOKENS: u32 = 200;

#[derive(Debug, Serialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub personalized_description: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationSet {
    pub generated_at: DateTime<Utc>,
    pub recommendations: Vec<Recommendation>,
    pub keywords_used: Vec<String>,
}

/// Turns free-form user input into catalog recommendations with generated
/// rationales. Generation calls are the cost driver: one for the keywords
/// plus at most `max_products` rationales.
pub struct RecommendUseCase {
    generator: Arc<dyn TextGenerator>,
    catalog: Arc<dyn Catalog>,
    retry: RetryPolicy,
}

impl RecommendUseCase {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        catalog: Arc<dyn Catalog>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            generator,
            catalog,
            retry,
        }
    }

    pub async fn execute(
        &self,
        user_input: &str,
        max_products: usize,
    ) -> Result<RecommendationSet, DomainError> {
        let keyword_prompt = format!(
            "Based on the following user input, generate 3-5 relevant product search keywords.\n\
             Format the response as a comma-separated list.\n\n\
             User Input: {user_input}"
        );
        let keywords_response = self
            .generator
            .generate(&keyword_prompt, GenerationOptions::default())
            .await?;

        let keywords: Vec<String> = keywords_response
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from)
            .collect();
        debug!(?keywords, "derived search keywords");

        // The per-keyword searches are independent; run them concurrently
        // and keep keyword order in the accumulated list.
        let searches = keywords.iter().map(|keyword| {
            let catalog = self.catalog.clone();
            let retry = self.retry.clone();
            let keyword = keyword.clone();
            async move {
                with_retry("catalog.search_items", &retry, || {
                    catalog.search_items(&keyword, None, RESULTS_PER_KEYWORD)
                })
                .await
            }
        });
        let per_keyword = futures::future::try_join_all(searches).await?;
        let all_items: Vec<CatalogItem> = per_keyword.into_iter().flatten().collect();

        let mut recommendations = Vec::new();
        for item in all_items.into_iter().take(max_products) {
            let prompt = format!(
                "Generate a personalized product recommendation based on the user's input and product details.\n\
                 Keep it concise (2-3 sentences) and highlight why it's relevant.\n\n\
                 User Input: {user_input}\n\
                 Product: {}\n\
                 Features: {}",
                item.title,
                item.features.join(", ")
            );
            let description = self
                .generator
                .generate(
                    &prompt,
                    GenerationOptions {
                        max_tokens: RATIONALE_MAX_TOKENS,
                        ..Default::default()
                    },
                )
                .await?;
            recommendations.push(Recommendation {
                item,
                personalized_description: description,
            });
        }

        Ok(RecommendationSet {
            generated_at: Utc::now(),
            recommendations,
            keywords_used: keywords,
        })
    }
}
