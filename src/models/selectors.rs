// src/models/selectors.rs

//! CSS selectors for scraping the calendar page and release detail pages.

use serde::{Deserialize, Serialize};

/// Selectors describing the calendar page layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarSelectors {
    /// Heading carrying the section label and year
    #[serde(default = "defaults::year_heading")]
    pub year_heading: String,

    /// Any heading that ends a year section (both heading tiers)
    #[serde(default = "defaults::section_boundary")]
    pub section_boundary: String,

    /// Element holding one day/month line
    #[serde(default = "defaults::line")]
    pub line: String,

    /// Link element inside a line
    #[serde(default = "defaults::link")]
    pub link: String,

    /// HTML attribute holding the detail page URL (usually "href")
    #[serde(default = "defaults::link_attr")]
    pub link_attr: String,
}

impl Default for CalendarSelectors {
    fn default() -> Self {
        Self {
            year_heading: defaults::year_heading(),
            section_boundary: defaults::section_boundary(),
            line: defaults::line(),
            link: defaults::link(),
            link_attr: defaults::link_attr(),
        }
    }
}

/// Selectors describing a release detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailSelectors {
    /// Container holding the product rows
    #[serde(default = "defaults::table")]
    pub table: String,

    /// Product row inside the container
    #[serde(default = "defaults::row")]
    pub row: String,

    #[serde(default = "defaults::title")]
    pub title: String,

    #[serde(default = "defaults::brewery")]
    pub brewery: String,

    #[serde(default = "defaults::price")]
    pub price: String,

    #[serde(default = "defaults::size")]
    pub size: String,

    #[serde(default = "defaults::abv")]
    pub abv: String,

    #[serde(default = "defaults::style")]
    pub style: String,

    #[serde(default = "defaults::country")]
    pub country: String,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            table: defaults::table(),
            row: defaults::row(),
            title: defaults::title(),
            brewery: defaults::brewery(),
            price: defaults::price(),
            size: defaults::size(),
            abv: defaults::abv(),
            style: defaults::style(),
            country: defaults::country(),
        }
    }
}

impl DetailSelectors {
    /// Field selectors paired with the field name, in record order.
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("title", &self.title),
            ("brewery", &self.brewery),
            ("price", &self.price),
            ("size", &self.size),
            ("abv", &self.abv),
            ("style", &self.style),
            ("country", &self.country),
        ]
    }
}

mod defaults {
    // Calendar page
    pub fn year_heading() -> String {
        "h2".into()
    }
    pub fn section_boundary() -> String {
        "h2, h3".into()
    }
    pub fn line() -> String {
        "p, li".into()
    }
    pub fn link() -> String {
        "a[href]".into()
    }
    pub fn link_attr() -> String {
        "href".into()
    }

    // Detail page
    pub fn table() -> String {
        "table".into()
    }
    pub fn row() -> String {
        "tbody > tr".into()
    }
    pub fn title() -> String {
        "td.title".into()
    }
    pub fn brewery() -> String {
        "td.brewery".into()
    }
    pub fn price() -> String {
        "td.price".into()
    }
    pub fn size() -> String {
        "td.size".into()
    }
    pub fn abv() -> String {
        "td.abv".into()
    }
    pub fn style() -> String {
        "td.type".into()
    }
    pub fn country() -> String {
        "td.country".into()
    }
}
