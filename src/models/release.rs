//! Release data structures.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One product row from a release detail page.
///
/// Every field is kept as the display string found on the page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BeerRecord {
    /// Product name
    pub title: String,

    /// Producer name
    pub brewery: String,

    /// Price without currency
    pub price: String,

    /// Pack size (e.g. "33cl")
    pub size: String,

    /// Alcohol by volume (e.g. "6%")
    pub abv: String,

    /// Style or type
    pub style: String,

    /// Country of origin
    pub country: String,
}

/// Section heading of a calendar page, split into its label and year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicHeading {
    pub label: String,
    pub year: i32,
}

impl TopicHeading {
    /// Parse a heading laid out as a label line followed by a year line.
    ///
    /// A heading consisting of the year alone is accepted with an empty label.
    pub fn parse(text: &str) -> Option<Self> {
        let segments: Vec<&str> = text
            .trim()
            .lines()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        let (label, year) = match segments.as_slice() {
            [year] => ("", *year),
            [label, year, ..] => (*label, *year),
            [] => return None,
        };

        let year_pattern = Regex::new(r"^\d{4}$").ok()?;
        if !year_pattern.is_match(year) {
            return None;
        }

        Some(Self {
            label: label.to_string(),
            year: year.parse().ok()?,
        })
    }
}

/// A dated detail-page link found on the calendar page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub date: NaiveDate,
    pub link: String,
}

/// A confirmed release: one date, one detail link and its beers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Release {
    /// Release date
    pub date: NaiveDate,

    /// Detail page link as found on the calendar page
    pub url: String,

    /// Beers in page order (never empty)
    pub beers: Vec<BeerRecord>,
}

/// Releases of one run, ordered by date and then by discovery order.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ReleaseSet(Vec<Release>);

impl ReleaseSet {
    /// Build a set from releases in discovery order.
    pub fn from_unsorted(mut releases: Vec<Release>) -> Self {
        // `sort_by_key` is stable, so same-day releases keep discovery order.
        releases.sort_by_key(|release| release.date);
        Self(releases)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Release> {
        self.0.iter()
    }

    /// Total number of beers across all releases.
    pub fn beer_count(&self) -> usize {
        self.0.iter().map(|release| release.beers.len()).sum()
    }
}

impl IntoIterator for ReleaseSet {
    type Item = Release;
    type IntoIter = std::vec::IntoIter<Release>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ReleaseSet {
    type Item = &'a Release;
    type IntoIter = std::slice::Iter<'a, Release>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
