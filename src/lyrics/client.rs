//! Resilient JSON fetches against a lyrics provider
//!
//! Every provider call goes through [`ProviderClient::fetch_json`], which
//! retries transient failures with a linearly increasing delay.

use super::error::FetchError;
use anyhow::Context;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry and timeout settings for provider calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Per-request timeout
    pub timeout: Duration,
    /// Total tries per call, including the first one
    pub max_attempts: u32,
    /// Delay before retry `n` is `backoff_base * n`
    pub backoff_base: Duration,
}

impl RetryPolicy {
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(12),
            max_attempts: 3,
            backoff_base: Duration::from_millis(1200),
        }
    }
}

/// A single HTTP GET returning the response body on a 2xx status.
pub trait Transport: Send + Sync {
    fn get(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .context("build reqwest client")?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(FetchError::from_reqwest)
    }
}

/// Fetch-and-decode client shared by both providers.
#[derive(Debug, Clone)]
pub struct ProviderClient<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: Transport> ProviderClient<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// GET `url` and decode the body as JSON.
    ///
    /// Timeouts and connection failures are retried until attempts run out.
    /// HTTP errors are retried only for transient statuses; anything else is
    /// returned at once. After the last attempt the last error is returned.
    pub async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            debug!(url, attempt, "provider request");
            match self.transport.get(url, self.policy.timeout).await {
                Ok(body) => {
                    return serde_json::from_str(&body)
                        .map_err(|e| FetchError::Decode(e.to_string()));
                }
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    let delay = self.policy.backoff(attempt);
                    warn!(
                        url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "provider request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    debug!(url, attempt, error = %err, "provider request failed");
                    return Err(err);
                }
            }
        }
    }
}
