use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, ClientBuilder};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::error::{KolexError, Result};

/// Retry count used by the pipeline when none is configured
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Raw upstream response, returned for every non-retryable status
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
    pub content_type: Option<String>,
}

impl FetchResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Trait for throttled upstream access
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch `url`, retrying 429/5xx up to `max_retries` times.
    ///
    /// Any other status (404 included) is returned as-is. Exhausting the
    /// retries is an error.
    async fn fetch(&self, url: &str, max_retries: u32) -> Result<FetchResponse>;
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds
    pub timeout: u64,
    /// Minimum gap between two requests, across all hosts (milliseconds)
    pub min_interval_ms: u64,
    /// Base unit for exponential backoff (milliseconds); attempt `n` waits `base * 2^(n+1)`
    pub retry_base_delay_ms: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            min_interval_ms: 500,
            retry_base_delay_ms: 1000,
            user_agent: format!("kolex/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client with one process-wide request throttle
pub struct RateLimitedClient {
    config: ClientConfig,
    http_client: Client,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimitedClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http_client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout))
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .user_agent(config.user_agent.clone())
            .use_rustls_tls()
            .build()?;

        Ok(Self {
            config,
            http_client,
            last_request: Mutex::new(None),
        })
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.config.min_interval_ms)
    }

    /// Delay before retry number `attempt + 1`, saturating for very large retry counts
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = attempt
            .checked_add(1)
            .and_then(|exp| 2u32.checked_pow(exp))
            .unwrap_or(u32::MAX);
        Duration::from_millis(self.config.retry_base_delay_ms).saturating_mul(factor)
    }

    /// Wait out the minimum interval, then stamp the request start
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            let interval = self.min_interval();
            if elapsed < interval {
                sleep(interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn mark_request_finished(&self) {
        *self.last_request.lock().await = Some(Instant::now());
    }
}

#[async_trait]
impl Fetch for RateLimitedClient {
    async fn fetch(&self, url: &str, max_retries: u32) -> Result<FetchResponse> {
        let mut attempt = 0;

        loop {
            self.throttle().await;
            debug!("GET {} (attempt {})", url, attempt + 1);

            let sent = self.http_client.get(url).send().await;
            self.mark_request_finished().await;
            let response = sent?;

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                if attempt >= max_retries {
                    return Err(KolexError::RetriesExhausted {
                        url: url.to_string(),
                        status: status.as_u16(),
                        attempts: attempt.saturating_add(1),
                    });
                }

                let delay = self.backoff_delay(attempt);
                warn!("{} returned {}, retrying in {:?}", url, status, delay);
                sleep(delay).await;
                attempt += 1;
                continue;
            }

            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.text().await?;

            return Ok(FetchResponse {
                status: status.as_u16(),
                body,
                content_type,
            });
        }
    }
}
