use anyhow::{Result, anyhow};
use std::time::{Duration, Instant};

use super::types::ProbeResult;

/// Checker trait for probing a single target
///
/// Implementations never fail: every transport error is folded into
/// [`ProbeResult::failure`].
#[async_trait::async_trait]
pub trait Checker: Send + Sync {
    /// Probe `target` once and classify the outcome
    async fn probe(&self, target: &str) -> ProbeResult;
}

/// HTTP/HTTPS checker issuing one timed GET per probe
pub struct HttpChecker {
    client: reqwest::Client,
}

impl HttpChecker {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pinger/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// GET the target and drain the body, returning the status code
    async fn fetch(&self, target: &str) -> Result<u16> {
        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

        let status_code = response.status().as_u16();

        response.bytes().await.map_err(|e| anyhow!("Failed to read response body: {}", e))?;

        Ok(status_code)
    }
}

#[async_trait::async_trait]
impl Checker for HttpChecker {
    async fn probe(&self, target: &str) -> ProbeResult {
        let start = Instant::now();

        match self.fetch(target).await {
            Ok(status_code) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                ProbeResult::success(status_code, duration_ms)
            }
            Err(e) => ProbeResult::failure(e.to_string()),
        }
    }
}
