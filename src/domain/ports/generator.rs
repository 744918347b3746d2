use crate::domain::entities::chat_message::ChatMessage;
use crate::domain::error::DomainError;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_prompt: Option<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: 0.7,
            system_prompt: None,
        }
    }
}

/// Text generation capability. Stateless: every call is a fresh request.
///
/// Calls are NOT retried here. Generation backends are often rate-limited
/// themselves and a duplicate call costs money on an ambiguous failure; a
/// caller that wants retry composes the retry wrapper explicitly.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Single completion over an ordered message list.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        opts: GenerationOptions,
    ) -> Result<String, DomainError>;

    async fn generate(&self, prompt: &str, opts: GenerationOptions) -> Result<String, DomainError> {
        self.complete(vec![ChatMessage::user(prompt)], opts).await
    }

    /// Convenience composition: `instruction` followed by the document body.
    async fn analyze(
        &self,
        document: &str,
        instruction: &str,
        max_tokens: u32,
    ) -> Result<String, DomainError> {
        let prompt = format!("{instruction}\n\nDocument:\n{document}");
        self.generate(
            &prompt,
            GenerationOptions {
                max_tokens,
                ..Default::default()
            },
        )
        .await
    }

    /// Multi-turn chat. When present, `context` rides a synthetic leading
    /// user turn; the remaining messages pass through in caller order.
    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        context: Option<&str>,
        system_prompt: Option<&str>,
    ) -> Result<String, DomainError> {
        let mut turns = Vec::with_capacity(messages.len() + 1);
        if let Some(ctx) = context {
            turns.push(ChatMessage::user(format!("Context:\n{ctx}")));
        }
        turns.extend(messages);
        self.complete(
            turns,
            GenerationOptions {
                system_prompt: system_prompt.map(|s| s.to_string()),
                ..Default::default()
            },
        )
        .await
    }
}
