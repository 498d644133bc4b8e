// src/services/notifier.rs

//! Release notification.
//!
//! Formats a [`Release`] as a chat message and delivers it through a
//! [`Notifier`].

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{NotifierConfig, Release};
use crate::utils::resolve;

/// Delivers one formatted text block.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<()>;
}

/// Incoming-webhook payload.
#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    text: &'a str,
}

/// Posts messages to a chat incoming webhook.
pub struct WebhookNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl WebhookNotifier {
    pub fn new(client: reqwest::Client, webhook_url: impl Into<String>) -> Self {
        Self {
            client,
            webhook_url: webhook_url.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        let body = serde_json::to_vec(&WebhookMessage { text })?;
        let response = self
            .client
            .post(&self.webhook_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(AppError::notify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::notify(format!("webhook returned {status}")));
        }
        Ok(())
    }
}

/// Prints messages to stdout instead of delivering them.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        println!("{text}");
        Ok(())
    }
}

/// Renders releases as chat messages.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    headline: String,
    columns: String,
    currency: String,
    /// Base for relative release links
    link_base: String,
}

impl MessageFormatter {
    pub fn new(config: &NotifierConfig, link_base: impl Into<String>) -> Self {
        Self {
            headline: config.headline.clone(),
            columns: config.columns.clone(),
            currency: config.currency.clone(),
            link_base: link_base.into(),
        }
    }

    /// Headline with date, link, column header, then one line per beer.
    pub fn format_release(&self, release: &Release) -> String {
        let mut text = format!(
            "{} ({})\n{}\n\n{}\n",
            self.headline,
            release.date,
            resolve(&self.link_base, &release.url),
            self.columns
        );

        for beer in &release.beers {
            let price = if self.currency.is_empty() {
                beer.price.clone()
            } else {
                format!("{} {}", beer.price, self.currency)
            };
            text.push_str(&format!(
                "*{}*, {}, {}, {}, {}, {}, {}\n",
                beer.title, beer.brewery, price, beer.size, beer.abv, beer.style, beer.country
            ));
        }

        text
    }
}
