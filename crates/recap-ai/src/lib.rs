//! Summarizer transport for recap.
//!
//! Exposes the `LlmClient` contract plus OpenAI-compatible and Anthropic HTTP
//! clients with bounded retry, used by the narrative layer to request prose
//! summaries of clustered activity.
mod anthropic;
mod openai;
mod provider;
mod retry;
mod types;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use provider::{ModelRef, ModelRefParseError, Provider};
pub use types::{
    ChatRequest, ChatResponse, ChatUsage, LlmClient, Message, MessageRole, RecapAiError,
};
