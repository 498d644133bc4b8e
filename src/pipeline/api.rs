// src/pipeline/api.rs

//! Product API collection.

use crate::error::Result;
use crate::models::{Config, Diagnostics};
use crate::pipeline::RunReport;
use crate::services::{ProductApiClient, ReleaseWindow};
use crate::utils::http::create_async_client;

/// Query the product API and group the hits into a release set.
pub async fn collect_api(config: &Config, window: &ReleaseWindow) -> Result<RunReport> {
    if config.api.subscription_key.is_empty() {
        log::warn!("api.subscription_key is empty; the API will likely reject the request");
    }

    let client = ProductApiClient::new(create_async_client(&config.fetcher)?, config.api.clone());

    log::info!("Querying product API {}", config.api.url);
    let mut diagnostics = Diagnostics::new();
    let releases = client.releases(window, &mut diagnostics).await?;

    Ok(RunReport {
        candidate_count: releases.len(),
        releases,
        diagnostics,
    })
}
