use httpmock::prelude::*;
use recap_ai::{
    AnthropicClient, AnthropicConfig, ChatRequest, LlmClient, Message, OpenAiClient, OpenAiConfig,
    RecapAiError,
};
use serde_json::json;
use std::time::Duration;

fn openai_config(base_url: String) -> OpenAiConfig {
    OpenAiConfig {
        api_base: format!("{base_url}/v1"),
        api_key: "test-openai-key".to_string(),
        request_timeout_ms: 5_000,
        max_retries: 2,
        retry_budget_ms: 0,
        retry_jitter: false,
    }
}

fn summary_request() -> ChatRequest {
    ChatRequest {
        model: "gpt-4o-mini".to_string(),
        messages: vec![
            Message::system("Summarize developer activity."),
            Message::user("Clusters: Login & Form (2 items)"),
        ],
        max_tokens: Some(128),
        temperature: Some(0.0),
    }
}

#[tokio::test]
async fn integration_openai_client_sends_expected_http_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer test-openai-key")
            .header_exists("x-recap-request-id")
            .header("x-recap-retry-attempt", "0")
            .json_body_includes(
                json!({
                    "model": "gpt-4o-mini",
                    "messages": [{"role": "system"}, {"role": "user"}],
                    "max_tokens": 128
                })
                .to_string(),
            );

        then.status(200).json_body(json!({
            "choices": [{
                "message": {
                    "content": "Most of the week went into the login form."
                },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 5,
                "completion_tokens": 3,
                "total_tokens": 8
            }
        }));
    });

    let client = OpenAiClient::new(openai_config(server.base_url()))
        .expect("openai client should be created");

    let response = client
        .complete(summary_request())
        .await
        .expect("openai completion should succeed");

    mock.assert();
    assert_eq!(
        response.message.text_content(),
        "Most of the week went into the login form."
    );
    assert_eq!(response.usage.total_tokens, 8);
}

#[tokio::test]
async fn integration_anthropic_client_sends_expected_http_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/messages")
            .header("x-api-key", "test-anthropic-key")
            .header("anthropic-version", "2023-06-01")
            .json_body_includes(
                json!({
                    "model": "claude-3-5-haiku-latest",
                    "system": "Summarize developer activity.",
                    "messages": [{"role": "user"}]
                })
                .to_string(),
            );
        then.status(200).json_body(json!({
            "content": [{"type": "text", "text": "Focused on auth."}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 9, "output_tokens": 4}
        }));
    });

    let client = AnthropicClient::new(AnthropicConfig {
        api_base: format!("{}/v1", server.base_url()),
        api_key: "test-anthropic-key".to_string(),
        request_timeout_ms: 5_000,
        max_retries: 0,
        retry_budget_ms: 0,
        retry_jitter: false,
    })
    .expect("anthropic client should be created");

    let mut request = summary_request();
    request.model = "claude-3-5-haiku-latest".to_string();
    let response = client
        .complete(request)
        .await
        .expect("anthropic completion should succeed");

    mock.assert();
    assert_eq!(response.message.text_content(), "Focused on auth.");
    assert_eq!(response.usage.total_tokens, 13);
}

#[tokio::test]
async fn integration_openai_client_surfaces_http_status_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(401).body("unauthorized");
    });

    let client = OpenAiClient::new(openai_config(server.base_url()))
        .expect("openai client should be created");

    let error = client
        .complete(summary_request())
        .await
        .expect_err("request should fail with 401");

    match error {
        RecapAiError::HttpStatus { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("unauthorized"));
        }
        other => panic!("expected RecapAiError::HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn integration_openai_client_retries_on_rate_limit_then_succeeds() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("x-recap-retry-attempt", "0");
        then.status(429).body("rate limited");
    });
    let second = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("x-recap-retry-attempt", "1");
        then.status(200).json_body(json!({
            "choices": [{
                "message": {"content": "ok after retry"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}
        }));
    });

    let client = OpenAiClient::new(openai_config(server.base_url()))
        .expect("openai client should be created");

    let response = client
        .complete(summary_request())
        .await
        .expect("retry should eventually succeed");

    assert_eq!(response.message.text_content(), "ok after retry");
    first.assert_calls(1);
    second.assert_calls(1);
}

#[tokio::test]
async fn regression_openai_client_retry_budget_can_block_retries() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("x-recap-retry-attempt", "0");
        then.status(429).body("rate limited");
    });
    let second = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("x-recap-retry-attempt", "1");
        then.status(200).json_body(json!({
            "choices": [{
                "message": {"content": "should not be reached"},
                "finish_reason": "stop"
            }]
        }));
    });

    let mut config = openai_config(server.base_url());
    config.retry_budget_ms = 10;
    config.retry_jitter = true;
    let client = OpenAiClient::new(config).expect("openai client should be created");

    let error = client
        .complete(summary_request())
        .await
        .expect_err("retry budget should block retry");

    match error {
        RecapAiError::HttpStatus { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("rate limited"));
        }
        other => panic!("expected RecapAiError::HttpStatus, got {other:?}"),
    }

    first.assert_calls(1);
    second.assert_calls(0);
}

#[tokio::test]
async fn regression_openai_client_returns_timeout_error_when_server_is_slow() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200)
            .delay(Duration::from_millis(120))
            .json_body(json!({
                "choices": [{
                    "message": {"content": "late"},
                    "finish_reason": "stop"
                }]
            }));
    });

    let mut config = openai_config(server.base_url());
    config.request_timeout_ms = 40;
    config.max_retries = 0;
    let client = OpenAiClient::new(config).expect("openai client should be created");

    let error = client
        .complete(summary_request())
        .await
        .expect_err("request should timeout");

    match error {
        RecapAiError::Http(inner) => assert!(inner.is_timeout()),
        other => panic!("expected timeout HTTP error, got {other:?}"),
    }
}

#[test]
fn regression_clients_reject_blank_api_keys() {
    let mut config = openai_config("http://127.0.0.1:9".to_string());
    config.api_key = "   ".to_string();
    assert!(matches!(
        OpenAiClient::new(config),
        Err(RecapAiError::MissingApiKey)
    ));
}
