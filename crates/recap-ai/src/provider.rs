use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Summarizer backends recap knows how to call.
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
        }
    }

    pub fn default_api_base(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Anthropic => "https://api.anthropic.com/v1",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelRefParseError {
    #[error("missing model identifier")]
    MissingModel,
    #[error("unsupported provider '{0}'. Supported providers: openai, openrouter (alias), groq (alias), anthropic")]
    UnsupportedProvider(String),
}

impl FromStr for Provider {
    type Err = ModelRefParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "openai" | "openrouter" | "groq" => Ok(Provider::OpenAi),
            "anthropic" => Ok(Provider::Anthropic),
            _ => Err(ModelRefParseError::UnsupportedProvider(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// `provider/model` reference; a bare model name selects OpenAI.
pub struct ModelRef {
    pub provider: Provider,
    pub model: String,
}

impl ModelRef {
    pub fn parse(input: &str) -> Result<Self, ModelRefParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ModelRefParseError::MissingModel);
        }

        if let Some((provider, model)) = trimmed.split_once('/') {
            let model = model.trim();
            if model.is_empty() {
                return Err(ModelRefParseError::MissingModel);
            }

            return Ok(Self {
                provider: Provider::from_str(provider)?,
                model: model.to_string(),
            });
        }

        Ok(Self {
            provider: Provider::OpenAi,
            model: trimmed.to_string(),
        })
    }
}
