use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use recap_ai::{
    AnthropicClient, AnthropicConfig, LlmClient, ModelRef, OpenAiClient, OpenAiConfig, Provider,
};
use recap_report::{LlmSummarizer, Summarizer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, CliSummarizer};

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-latest";
const SUMMARIZER_MAX_RETRIES: usize = 1;

pub(crate) fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn resolve_api_key(candidates: Vec<Option<String>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

/// Model name for `provider`; a `provider/model` reference must agree with it.
pub(crate) fn resolve_model(provider: Provider, requested: Option<&str>) -> Result<String> {
    let Some(requested) = requested.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(match provider {
            Provider::OpenAi => DEFAULT_OPENAI_MODEL.to_string(),
            Provider::Anthropic => DEFAULT_ANTHROPIC_MODEL.to_string(),
        });
    };
    if !requested.contains('/') {
        return Ok(requested.to_string());
    }
    let model_ref = ModelRef::parse(requested)?;
    if model_ref.provider != provider {
        bail!(
            "model '{}' targets provider '{}' but --summarizer is '{}'",
            requested,
            model_ref.provider,
            provider
        );
    }
    Ok(model_ref.model)
}

pub(crate) fn build_summarizer(cli: &Cli) -> Result<Option<Arc<dyn Summarizer>>> {
    let provider = match cli.summarizer {
        CliSummarizer::None => return Ok(None),
        CliSummarizer::Openai => Provider::OpenAi,
        CliSummarizer::Anthropic => Provider::Anthropic,
    };
    let model = resolve_model(provider, cli.model.as_deref())?;
    let api_base = cli
        .api_base
        .clone()
        .unwrap_or_else(|| provider.default_api_base().to_string());
    let request_timeout_ms = cli.summary_timeout_ms.max(1);

    let client: Arc<dyn LlmClient> = match provider {
        Provider::OpenAi => {
            let api_key = resolve_api_key(vec![
                cli.api_key.clone(),
                std::env::var("OPENAI_API_KEY").ok(),
            ])
            .ok_or_else(|| anyhow!("missing OpenAI API key. Set RECAP_API_KEY, OPENAI_API_KEY, or --api-key"))?;
            Arc::new(OpenAiClient::new(OpenAiConfig {
                api_base,
                api_key,
                        request_timeout_ms,
                max_retries: SUMMARIZER_MAX_RETRIES,
                retry_budget_ms: request_timeout_ms,
                retry_jitter: true,
            })?)
        }
        Provider::Anthropic => {
            let api_key = resolve_api_key(vec![
                cli.api_key.clone(),
                std::env::var("ANTHROPIC_API_KEY").ok(),
            ])
            .ok_or_else(|| {
                anyhow!("missing Anthropic API key. Set RECAP_API_KEY, ANTHROPIC_API_KEY, or --api-key")
            })?;
            Arc::new(AnthropicClient::new(AnthropicConfig {
                api_base,
                api_key,
                request_timeout_ms,
                max_retries: SUMMARIZER_MAX_RETRIES,
                retry_budget_ms: request_timeout_ms,
                retry_jitter: true,
            })?)
        }
    };

    tracing::debug!(provider = %provider, model = %model, "summarizer configured");
    Ok(Some(Arc::new(LlmSummarizer::new(client, model))))
}
