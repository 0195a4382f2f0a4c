use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::time::sleep;

use crate::RecapAiError;

pub const BASE_BACKOFF_MS: u64 = 200;

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(1);
static JITTER_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Retry knobs shared by the HTTP summarizer clients.
pub struct RetryPolicy {
    pub max_retries: usize,
    pub retry_budget_ms: u64,
    pub retry_jitter: bool,
}

pub fn should_retry_status(status: u16) -> bool {
    status == 408 || status == 409 || status == 425 || status == 429 || status >= 500
}

pub fn next_backoff_ms(attempt: usize) -> u64 {
    let shift = attempt.min(6);
    BASE_BACKOFF_MS.saturating_mul(1_u64 << shift)
}

pub fn next_backoff_ms_with_jitter(attempt: usize, jitter_enabled: bool) -> u64 {
    let base = next_backoff_ms(attempt);
    if !jitter_enabled || base <= 1 {
        return base;
    }

    // Bounded jitter in [50%, 100%] of the deterministic backoff.
    let low = base / 2;
    let width = base.saturating_sub(low);
    let seed = JITTER_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mixed = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).rotate_left(17) ^ 0xA24B_AED4_963E_E407;
    let jitter = if width == 0 {
        0
    } else {
        mixed % width.saturating_add(1)
    };
    low.saturating_add(jitter)
}

pub fn parse_retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    let raw = headers.get("retry-after")?.to_str().ok()?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(seconds) = raw.parse::<u64>() {
        return Some(seconds.saturating_mul(1000));
    }

    let retry_at = DateTime::parse_from_rfc2822(raw).ok()?.with_timezone(&Utc);
    let delay_ms = retry_at.signed_duration_since(Utc::now()).num_milliseconds();
    if delay_ms <= 0 {
        return Some(0);
    }

    u64::try_from(delay_ms).ok()
}

pub fn provider_retry_delay_ms(
    attempt: usize,
    jitter_enabled: bool,
    retry_after_ms: Option<u64>,
) -> u64 {
    let backoff_ms = next_backoff_ms_with_jitter(attempt, jitter_enabled);
    match retry_after_ms {
        Some(retry_after_ms) => backoff_ms.max(retry_after_ms),
        None => backoff_ms,
    }
}

pub fn retry_budget_allows_delay(elapsed_ms: u64, delay_ms: u64, retry_budget_ms: u64) -> bool {
    if retry_budget_ms == 0 {
        return true;
    }
    elapsed_ms.saturating_add(delay_ms) <= retry_budget_ms
}

pub fn is_retryable_http_error(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.is_request() || error.is_body()
}

pub fn new_request_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let count = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("recap-rs-{millis}-{count}")
}

/// Posts `body` to `url`, retrying transient failures, and returns the raw success body.
pub(crate) async fn post_json_with_retry(
    client: &reqwest::Client,
    url: &str,
    body: &Value,
    policy: RetryPolicy,
) -> Result<String, RecapAiError> {
    let started = Instant::now();
    let max_retries = policy.max_retries;

    for attempt in 0..=max_retries {
        let response = client
            .post(url)
            .header("x-recap-request-id", new_request_id())
            .header("x-recap-retry-attempt", attempt.to_string())
            .json(body)
            .send()
            .await;

        match response {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return Ok(response.text().await?);
                }

                let retry_after_ms = parse_retry_after_ms(response.headers());
                let raw = response.text().await?;
                if attempt < max_retries && should_retry_status(status.as_u16()) {
                    let backoff_ms =
                        provider_retry_delay_ms(attempt, policy.retry_jitter, retry_after_ms);
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    if retry_budget_allows_delay(elapsed_ms, backoff_ms, policy.retry_budget_ms) {
                        tracing::debug!(
                            status = status.as_u16(),
                            attempt,
                            backoff_ms,
                            "retrying summarizer request after provider status"
                        );
                        sleep(Duration::from_millis(backoff_ms)).await;
                        continue;
                    }
                }

                return Err(RecapAiError::HttpStatus {
                    status: status.as_u16(),
                    body: raw,
                });
            }
            Err(error) => {
                if attempt < max_retries && is_retryable_http_error(&error) {
                    let backoff_ms = provider_retry_delay_ms(attempt, policy.retry_jitter, None);
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    if retry_budget_allows_delay(elapsed_ms, backoff_ms, policy.retry_budget_ms) {
                        tracing::debug!(
                            %error,
                            attempt,
                            backoff_ms,
                            "retrying summarizer request after transport error"
                        );
                        sleep(Duration::from_millis(backoff_ms)).await;
                        continue;
                    }
                }
                return Err(RecapAiError::Http(error));
            }
        }
    }

    Err(RecapAiError::InvalidResponse(
        "request retry loop terminated unexpectedly".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use reqwest::header::{HeaderMap, HeaderValue};

    use super::{
        new_request_id, next_backoff_ms, next_backoff_ms_with_jitter, parse_retry_after_ms,
        provider_retry_delay_ms, retry_budget_allows_delay, should_retry_status,
    };

    #[test]
    fn unit_retry_status_selection_covers_transient_codes_only() {
        assert!(should_retry_status(429));
        assert!(should_retry_status(503));
        assert!(!should_retry_status(400));
        assert!(!should_retry_status(404));
    }

    #[test]
    fn unit_backoff_increases_per_attempt() {
        assert_eq!(next_backoff_ms(0), 200);
        assert_eq!(next_backoff_ms(1), 400);
        assert_eq!(next_backoff_ms(2), 800);
        assert_eq!(next_backoff_ms(40), next_backoff_ms(6));
    }

    #[test]
    fn unit_jittered_backoff_stays_within_expected_bounds() {
        let attempt = 3;
        let base = next_backoff_ms(attempt);
        let low = base / 2;
        for _ in 0..64 {
            let value = next_backoff_ms_with_jitter(attempt, true);
            assert!(value >= low, "expected {value} >= {low}");
            assert!(value <= base, "expected {value} <= {base}");
        }
    }

    #[test]
    fn unit_parse_retry_after_ms_accepts_seconds_and_rejects_invalid_values() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("3"));
        assert_eq!(parse_retry_after_ms(&headers), Some(3_000));

        headers.insert("retry-after", HeaderValue::from_static("not-a-number"));
        assert_eq!(parse_retry_after_ms(&headers), None);
    }

    #[test]
    fn functional_parse_retry_after_ms_treats_past_dates_as_immediate() {
        let mut headers = HeaderMap::new();
        let raw = (Utc::now() - Duration::seconds(30))
            .to_rfc2822()
            .replace("+0000", "GMT");
        headers.insert(
            "retry-after",
            HeaderValue::from_str(raw.as_str()).expect("retry-after date"),
        );
        assert_eq!(parse_retry_after_ms(&headers), Some(0));
    }

    #[test]
    fn regression_provider_retry_delay_honors_retry_after_floor() {
        assert_eq!(provider_retry_delay_ms(0, false, None), 200);
        assert_eq!(provider_retry_delay_ms(2, false, Some(100)), 800);
        assert_eq!(provider_retry_delay_ms(0, false, Some(1_500)), 1_500);
    }

    #[test]
    fn unit_retry_budget_math_respects_zero_and_bounded_budgets() {
        assert!(retry_budget_allows_delay(50, 100, 0));
        assert!(retry_budget_allows_delay(50, 50, 100));
        assert!(!retry_budget_allows_delay(50, 60, 100));
    }

    #[test]
    fn unit_request_ids_are_unique() {
        let a = new_request_id();
        let b = new_request_id();
        assert_ne!(a, b);
        assert!(a.starts_with("recap-rs-"));
    }
}
