// src/services/products.rs

//! Structured product API client.
//!
//! Queries the product search endpoint for beers whose sale starts inside
//! the release window and groups them into releases by sell-start date.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, BeerRecord, Diagnostics, Release, ReleaseSet, Skipped, Stage};
use crate::services::ReleaseWindow;

const SUBSCRIPTION_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// One product hit from the search endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    #[serde(default)]
    pub product_id: Option<String>,
    pub product_name_bold: String,
    #[serde(default)]
    pub product_name_thin: Option<String>,
    #[serde(default)]
    pub producer_name: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub alcohol_percentage: f64,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// ISO date, optionally followed by a time (`2025-08-05T00:00:00`)
    pub sell_start_date: String,
}

impl Product {
    /// Calendar day the product goes on sale.
    pub fn sell_start(&self) -> Option<NaiveDate> {
        let day = self.sell_start_date.get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    /// Display record for messages.
    pub fn to_beer(&self) -> BeerRecord {
        let title = match self.product_name_thin.as_deref().map(str::trim) {
            Some(thin) if !thin.is_empty() => format!("{} {}", self.product_name_bold, thin),
            _ => self.product_name_bold.clone(),
        };

        BeerRecord {
            title,
            brewery: self.producer_name.clone().unwrap_or_default(),
            price: format!("{:.2}", self.price),
            size: format!("{} ml", format_number(self.volume)),
            abv: format!("{}%", format_number(self.alcohol_percentage)),
            style: self.style.clone().unwrap_or_default(),
            country: self.country.clone().unwrap_or_default(),
        }
    }
}

/// Whole numbers without decimals, everything else with one.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Hits", default)]
    hits: Vec<Product>,
}

/// Client for the product search endpoint.
pub struct ProductApiClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl ProductApiClient {
    pub fn new(client: reqwest::Client, config: ApiConfig) -> Self {
        Self { client, config }
    }

    /// Query parameters selecting new products inside `window`.
    pub fn search_query(&self, window: &ReleaseWindow) -> Vec<(&'static str, String)> {
        vec![
            ("AssortmentText", self.config.assortment_text.clone()),
            ("SellStartDateFrom", window.today().to_string()),
            ("SellStartDateTo", window.end().to_string()),
            ("SubCategory", self.config.sub_category.clone()),
        ]
    }

    /// Human-facing search link for products starting between two dates.
    pub fn search_page_url(&self, from: NaiveDate, to: NaiveDate) -> String {
        self.config
            .search_page_url
            .replace("{from}", &from.to_string())
            .replace("{to}", &to.to_string())
    }

    /// Fetch all products whose sale starts inside `window`.
    pub async fn search(&self, window: &ReleaseWindow) -> Result<Vec<Product>> {
        let url = &self.config.url;
        let response = self
            .client
            .get(url)
            .query(&self.search_query(window))
            .header(SUBSCRIPTION_HEADER, &self.config.subscription_key)
            .send()
            .await
            .map_err(|e| AppError::fetch(url, e))?
            .error_for_status()
            .map_err(|e| AppError::fetch(url, e))?;

        let body = response.text().await.map_err(|e| AppError::fetch(url, e))?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        Ok(parsed.hits)
    }

    /// Fetch products and group them into one release per sell-start date.
    pub async fn releases(
        &self,
        window: &ReleaseWindow,
        diagnostics: &mut Diagnostics,
    ) -> Result<ReleaseSet> {
        let products = self.search(window).await?;
        Ok(self.group(&products, diagnostics))
    }

    fn group(&self, products: &[Product], diagnostics: &mut Diagnostics) -> ReleaseSet {
        let mut by_date: BTreeMap<NaiveDate, Vec<BeerRecord>> = BTreeMap::new();

        for product in products {
            match product.sell_start() {
                Some(date) => by_date.entry(date).or_default().push(product.to_beer()),
                None => diagnostics.push(Skipped::new(
                    Stage::Row,
                    product
                        .product_id
                        .clone()
                        .unwrap_or_else(|| product.product_name_bold.clone()),
                    format!("unreadable sell start date '{}'", product.sell_start_date),
                )),
            }
        }

        let releases = by_date
            .into_iter()
            .map(|(date, beers)| Release {
                date,
                url: self.search_page_url(date, date),
                beers,
            })
            .collect();

        ReleaseSet::from_unsorted(releases)
    }
}
