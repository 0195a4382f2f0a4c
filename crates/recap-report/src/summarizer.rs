use std::sync::Arc;

use async_trait::async_trait;
use recap_ai::{ChatRequest, LlmClient, Message, RecapAiError};
use thiserror::Error;

pub const SUMMARY_SYSTEM_PROMPT: &str = "You summarize a developer's recent activity. \
Write two to four plain sentences describing what was worked on, using the clusters and \
connections provided. Do not invent work that is not listed.";
pub const DEFAULT_SUMMARY_MAX_TOKENS: u32 = 400;
pub const DEFAULT_SUMMARY_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Error)]
/// Enumerates supported `SummaryError` values.
pub enum SummaryError {
    #[error("summarizer request failed: {0}")]
    Client(#[from] RecapAiError),
    #[error("summarizer returned empty content")]
    Empty,
    #[error("summarizer failed: {0}")]
    Other(String),
}

#[async_trait]
/// Produces replacement narrative text for a prompt.
pub trait Summarizer: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, SummaryError>;
}

/// Summarizer backed by any chat-completion client.
pub struct LlmSummarizer {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl LlmSummarizer {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(SUMMARY_SYSTEM_PROMPT),
                Message::user(prompt),
            ],
            max_tokens: Some(DEFAULT_SUMMARY_MAX_TOKENS),
            temperature: Some(DEFAULT_SUMMARY_TEMPERATURE),
        };
        let response = self.client.complete(request).await?;
        let text = response.message.text_content();
        let text = text.trim();
        if text.is_empty() {
            return Err(SummaryError::Empty);
        }
        Ok(text.to_string())
    }
}
