//! HTTP client for the Shopify Admin REST API with retrying writes.
//!
//! Transient statuses (429 and the 5xx gateway family) are retried with
//! exponential backoff, capped, and a server `Retry-After` hint always wins
//! over the computed delay. Everything else fails the call on the first
//! attempt. The inter-attempt wait goes through [`Sleeper`] so tests can
//! observe delays instead of serving them.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use super::error::ShopifyError;
use crate::collection::CollectionPayload;

/// Statuses worth retrying: rate limiting and transient upstream failures.
const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Retry budget and backoff shape for one `POST` call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, first try included.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles from there.
    pub base_delay_ms: u64,
    /// Ceiling for the doubled delay.
    pub delay_cap_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 1000,
            delay_cap_ms: 16000,
        }
    }
}

impl RetryPolicy {
    pub fn is_retryable(&self, status: u16) -> bool {
        RETRYABLE_STATUSES.contains(&status)
    }

    /// Next backoff delay after `current_ms`: doubled, capped.
    pub fn next_delay(&self, current_ms: u64) -> u64 {
        (current_ms * 2).min(self.delay_cap_ms)
    }
}

/// The wait between attempts, abstracted for deterministic tests.
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub struct ShopifyClient<S: Sleeper = TokioSleeper> {
    token: String,
    client: Client,
    base_url: String,
    policy: RetryPolicy,
    sleeper: S,
}

impl ShopifyClient<TokioSleeper> {
    pub fn with_policy(token: String, base_url: String, policy: RetryPolicy) -> Self {
        Self::with_sleeper(token, base_url, policy, TokioSleeper)
    }
}

impl<S: Sleeper> ShopifyClient<S> {
    /// Create a client with an explicit sleeper (useful for testing).
    pub fn with_sleeper(token: String, base_url: String, policy: RetryPolicy, sleeper: S) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self {
            token,
            client,
            base_url,
            policy,
            sleeper,
        }
    }

    /// `POST` the payload to `<base>/<path>`, retrying transient failures.
    ///
    /// Returns the decoded response body on the first 2xx. Non-retryable
    /// statuses and network-level errors fail immediately; a retryable
    /// status on the last attempt becomes [`ShopifyError::RetriesExhausted`].
    pub async fn post_collection(
        &self,
        path: &str,
        payload: &CollectionPayload,
    ) -> Result<Value, ShopifyError> {
        let url = format!("{}/{}", self.base_url, path);
        let mut delay_ms = self.policy.base_delay_ms;

        for attempt in 1..=self.policy.max_attempts {
            let response = self
                .client
                .post(&url)
                .header("X-Shopify-Access-Token", &self.token)
                .header("Content-Type", "application/json")
                .header("Accept", "application/json")
                .json(payload)
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                return Ok(response.json::<Value>().await?);
            }

            if !self.policy.is_retryable(status.as_u16()) {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unknown error".to_string());
                return Err(ShopifyError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            if attempt == self.policy.max_attempts {
                break;
            }

            // The server's hint takes precedence over our own backoff.
            let wait_ms = retry_after_ms(&response).unwrap_or(delay_ms);
            self.sleeper.sleep(Duration::from_millis(wait_ms)).await;
            delay_ms = self.policy.next_delay(delay_ms);
        }

        Err(ShopifyError::RetriesExhausted {
            url,
            attempts: self.policy.max_attempts,
        })
    }
}

/// `Retry-After` in milliseconds. Shopify sends seconds, possibly fractional.
fn retry_after_ms(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<f64>().ok())
        .map(|secs| (secs * 1000.0) as u64)
}
