use crate::constants::{MAX_FETCH_ATTEMPTS, RETRY_BACKOFF_MS, USER_AGENT};
use crate::error::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Per-candidate fetch outcome. `NotFound` short-circuits to the next
/// candidate; `Transient` is retried before giving up on the fetch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("resource not found")]
    NotFound,

    #[error("transient upstream failure: {0}")]
    Transient(String),

    #[error("request failed: {0}")]
    Other(String),
}

/// Awaitable pause primitive threaded through the fetch client and the
/// orchestrator so tests can run with zero real delay.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}

pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// No-delay pacer for tests.
pub struct NoopPacer;

#[async_trait]
impl Pacer for NoopPacer {
    async fn pause(&self, _delay: Duration) {}
}

/// Bounded-timeout HTTP fetcher with transient retry and mandatory
/// inter-request pacing.
pub struct PageFetcher {
    client: reqwest::Client,
    request_delay: Duration,
    retry_delay: Duration,
    max_attempts: u32,
    pacer: Arc<dyn Pacer>,
}

impl PageFetcher {
    pub fn new(timeout: Duration, request_delay: Duration, pacer: Arc<dyn Pacer>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            request_delay,
            retry_delay: Duration::from_millis(RETRY_BACKOFF_MS),
            max_attempts: MAX_FETCH_ATTEMPTS,
            pacer,
        })
    }

    /// Fetches one locator. The inter-request pause is awaited after every
    /// attempt, successful or not; transient failures retry with a fixed
    /// backoff until the attempt cap is reached.
    pub async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let outcome = self.attempt(url).await;
            self.pacer.pause(self.request_delay).await;
            match outcome {
                Ok(body) => {
                    debug!(url, bytes = body.len(), "fetched");
                    return Ok(body);
                }
                Err(FetchError::Transient(message)) if attempt < self.max_attempts => {
                    warn!(url, attempt, %message, "transient fetch failure; backing off");
                    self.pacer.pause(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn attempt(&self, url: &str) -> std::result::Result<String, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                FetchError::Transient(e.to_string())
            } else {
                FetchError::Other(e.to_string())
            }
        })?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Err(FetchError::NotFound);
        }
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(FetchError::Transient(format!("status {status}")));
        }
        if !status.is_success() {
            return Err(FetchError::Other(format!("status {status}")));
        }
        response
            .text()
            .await
            .map_err(|e| FetchError::Transient(e.to_string()))
    }
}
