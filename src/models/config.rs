//! Application configuration structures.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{CalendarSelectors, DetailSelectors};
use crate::services::MonthTable;
use crate::utils::parse_selector;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP fetch behavior
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Calendar page location and layout
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Detail page layout
    #[serde(default)]
    pub detail: DetailSelectors,

    /// Localized month names
    #[serde(default)]
    pub locale: LocaleConfig,

    /// Structured product API
    #[serde(default)]
    pub api: ApiConfig,

    /// Chat webhook delivery
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Run-level choices
    #[serde(default)]
    pub run: RunConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Override values from environment variables.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("SLACK_URL") {
            self.notifier.webhook_url = url;
        }

        if let Some(key) = var("SUBSCRIPTION_KEY") {
            self.api.subscription_key = key;
        }

        if let Some(url) = var("CALENDAR_URL") {
            self.calendar.url = url;
        }

        if let Some(timeout) = var("FETCH_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.fetcher.timeout_secs = secs;
            }
        }

        if let Some(concurrent) = var("MAX_CONCURRENT") {
            if let Ok(n) = concurrent.parse() {
                self.fetcher.max_concurrent = n;
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        if self.fetcher.max_concurrent == 0 {
            return Err(AppError::validation("fetcher.max_concurrent must be > 0"));
        }
        if self.calendar.window_days <= 0 {
            return Err(AppError::validation("calendar.window_days must be > 0"));
        }

        MonthTable::from_names(&self.locale.months)?;

        let selectors = &self.calendar.selectors;
        for selector in [
            &selectors.year_heading,
            &selectors.section_boundary,
            &selectors.line,
            &selectors.link,
        ] {
            parse_selector(selector)?;
        }
        parse_selector(&self.detail.table)?;
        parse_selector(&self.detail.row)?;
        for (_, selector) in self.detail.fields() {
            parse_selector(selector)?;
        }

        match self.run.source {
            ReleaseSource::Calendar if self.calendar.url.trim().is_empty() => {
                Err(AppError::validation("calendar.url is empty"))
            }
            ReleaseSource::Api if self.api.url.trim().is_empty() => {
                Err(AppError::validation("api.url is empty"))
            }
            _ => Ok(()),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Timeout in seconds applied to every request
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum concurrent detail page fetches
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Delay before each detail page request in milliseconds
    #[serde(default)]
    pub request_delay_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
            request_delay_ms: 0,
        }
    }
}

/// Calendar page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// URL of the release calendar page
    #[serde(default)]
    pub url: String,

    /// Base for relative detail links (defaults to `url`)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Length of the release window in days
    #[serde(default = "defaults::window_days")]
    pub window_days: i64,

    #[serde(default)]
    pub selectors: CalendarSelectors,
}

impl CalendarConfig {
    /// URL that relative detail links are resolved against.
    pub fn link_base(&self) -> &str {
        self.base_url.as_deref().unwrap_or(&self.url)
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            base_url: None,
            window_days: defaults::window_days(),
            selectors: CalendarSelectors::default(),
        }
    }
}

/// Localized month names, January first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    #[serde(default = "defaults::months")]
    pub months: Vec<String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            months: defaults::months(),
        }
    }
}

/// Structured product API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Product search endpoint
    #[serde(default = "defaults::api_url")]
    pub url: String,

    /// Value of the `Ocp-Apim-Subscription-Key` header
    #[serde(default)]
    pub subscription_key: String,

    #[serde(default = "defaults::assortment_text")]
    pub assortment_text: String,

    #[serde(default = "defaults::sub_category")]
    pub sub_category: String,

    /// Human-facing search link; `{from}` and `{to}` are replaced by dates
    #[serde(default = "defaults::search_page_url")]
    pub search_page_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: defaults::api_url(),
            subscription_key: String::new(),
            assortment_text: defaults::assortment_text(),
            sub_category: defaults::sub_category(),
            search_page_url: defaults::search_page_url(),
        }
    }
}

/// Webhook delivery and message settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Incoming webhook URL
    #[serde(default)]
    pub webhook_url: String,

    #[serde(default)]
    pub mode: DispatchMode,

    /// First message line; the release date is appended
    #[serde(default = "defaults::headline")]
    pub headline: String,

    /// Column header line
    #[serde(default = "defaults::columns")]
    pub columns: String,

    /// Currency appended to prices
    #[serde(default = "defaults::currency")]
    pub currency: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            mode: DispatchMode::default(),
            headline: defaults::headline(),
            columns: defaults::columns(),
            currency: defaults::currency(),
        }
    }
}

/// Run-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub source: ReleaseSource,
}

/// When releases are handed to the notifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Collect and sort every release first
    #[default]
    Batch,
    /// Notify each release as soon as it is assembled
    Immediate,
}

impl FromStr for DispatchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "batch" => Ok(Self::Batch),
            "immediate" => Ok(Self::Immediate),
            other => Err(format!("unknown dispatch mode '{other}'")),
        }
    }
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Batch => f.write_str("batch"),
            Self::Immediate => f.write_str("immediate"),
        }
    }
}

/// Where releases come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseSource {
    /// Scrape the calendar page and its detail pages
    #[default]
    Calendar,
    /// Query the structured product API
    Api,
}

impl FromStr for ReleaseSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "calendar" => Ok(Self::Calendar),
            "api" => Ok(Self::Api),
            other => Err(format!("unknown release source '{other}'")),
        }
    }
}

impl fmt::Display for ReleaseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Calendar => f.write_str("calendar"),
            Self::Api => f.write_str("api"),
        }
    }
}

mod defaults {
    // Fetcher defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; release-radar/0.1)".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn max_concurrent() -> usize {
        4
    }

    // Calendar defaults
    pub fn window_days() -> i64 {
        7
    }
    pub fn months() -> Vec<String> {
        [
            "januari",
            "februari",
            "mars",
            "april",
            "maj",
            "juni",
            "juli",
            "augusti",
            "september",
            "oktober",
            "november",
            "december",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    // API defaults
    pub fn api_url() -> String {
        "https://api-extern.systembolaget.se/product/v1/product/search".into()
    }
    pub fn assortment_text() -> String {
        "Lokalt & Småskaligt".into()
    }
    pub fn sub_category() -> String {
        "Öl".into()
    }
    pub fn search_page_url() -> String {
        "https://www.systembolaget.se/sok-dryck/?assortmenttext=Sm%C3%A5%20partier\
         &sellstartdatefrom={from}&sellstartdateto={to}&subcategory=%C3%96l&fullassortment=1"
            .into()
    }

    // Message defaults
    pub fn headline() -> String {
        ":beers: *Nytt ölsläpp inom en vecka!* :beers:".into()
    }
    pub fn columns() -> String {
        "*Öl, Bryggeri, Pris, Storlek, ABV, Typ, Land*".into()
    }
    pub fn currency() -> String {
        "SEK".into()
    }
}
