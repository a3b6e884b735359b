use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::trace;

use super::LoadError;

const TIMEOUT_SECONDS: u64 = 30;

/// Thin HTTP client for catalogs, module scripts and plugin API calls.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .user_agent(concat!("gterm/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<Response, LoadError> {
        trace!(url, "GET");
        let failed = |reason: String| LoadError::FetchFailed {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("HTTP {status}")));
        }
        Ok(response)
    }

    pub async fn text(&self, url: &str) -> Result<String, LoadError> {
        self.get(url)
            .await?
            .text()
            .await
            .map_err(|e| LoadError::FetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    /// GET and decode. A body that does not decode counts as a failed fetch.
    pub async fn json<T: DeserializeOwned>(&self, url: &str) -> Result<T, LoadError> {
        let body = self.text(url).await?;
        serde_json::from_str(&body).map_err(|e| LoadError::FetchFailed {
            url: url.to_string(),
            reason: format!("malformed body: {e}"),
        })
    }
}
