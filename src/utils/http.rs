// src/utils/http.rs

//! HTTP client utilities and the document fetcher seam.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::FetcherConfig;

/// Retrieves a document body by URL.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch `url` and return the response body.
    ///
    /// Transport failures, timeouts and non-success statuses are
    /// reported as [`AppError::Fetch`].
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &FetcherConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetcher backed by a `reqwest` client with a bounded timeout.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a fetcher with its own client from fetcher settings.
    pub fn from_config(config: &FetcherConfig) -> Result<Self> {
        Ok(Self::new(create_async_client(config)?))
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::fetch(url, describe(&e)))?;

        let response = response
            .error_for_status()
            .map_err(|e| AppError::fetch(url, describe(&e)))?;

        response
            .text()
            .await
            .map_err(|e| AppError::fetch(url, describe(&e)))
    }
}

fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if let Some(status) = error.status() {
        format!("HTTP status {status}")
    } else {
        error.to_string()
    }
}
