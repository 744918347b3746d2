use crate::domain::entities::chat_message::ChatMessage;
use crate::domain::error::DomainError;
use crate::domain::ports::generator::{GenerationOptions, TextGenerator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_MODEL: &str = "claude-3-opus-20240229";
const API_VERSION: &str = "2023-06-01";

/// Client for the Anthropic messages API. Stateless; every call is a fresh
/// request and nothing here retries (see `TextGenerator` docs).
pub struct ClaudeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl ClaudeClient {
    pub fn new(api_key: String, model: Option<String>) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("ragkit/0.1")
            .build()
            .map_err(|e| DomainError::Generation(format!("generation client: {e}")))?;
        Ok(Self {
            client,
            base_url: "https://api.anthropic.com".into(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }
}

#[async_trait]
impl TextGenerator for ClaudeClient {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        opts: GenerationOptions,
    ) -> Result<String, DomainError> {
        let resp = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&MessagesRequest {
                model: &self.model,
                max_tokens: opts.max_tokens,
                temperature: opts.temperature,
                system: opts.system_prompt.as_deref(),
                messages: &messages,
            })
            .send()
            .await
            .map_err(|e| DomainError::Generation(format!("messages API: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Generation(format!(
                "messages API {status}: {body}"
            )));
        }

        let parsed: MessagesResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Generation(format!("messages API response: {e}")))?;

        Ok(parsed
            .content
            .into_iter()
            .map(|block| block.text)
            .collect::<Vec<_>>()
            .join(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_extraction() {
        let raw = r#"{"content":[{"type":"text","text":"Hello"},{"type":"text","text":" world"}]}"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        let text: String = parsed.content.into_iter().map(|b| b.text).collect();
        assert_eq!(text, "Hello world");
    }

    #[test]
    fn test_default_model() {
        let client = ClaudeClient::new("key".into(), None).unwrap();
        assert_eq!(client.model, DEFAULT_MODEL);
    }
}
