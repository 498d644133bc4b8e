// src/services/beers.rs

//! Detail page extraction.
//!
//! Reads one [`BeerRecord`] per product row of a release detail page.

use scraper::{ElementRef, Html, Selector};

use crate::error::Result;
use crate::models::{BeerRecord, DetailSelectors, Diagnostics, Skipped, Stage};
use crate::utils::parse_selector;

/// Beers found on a detail page, plus the rows that were dropped.
#[derive(Debug, Default)]
pub struct ExtractReport {
    /// Beers in row order
    pub beers: Vec<BeerRecord>,
    pub diagnostics: Diagnostics,
}

/// Extracts product rows using configured selectors.
pub struct BeerRowExtractor {
    table: Selector,
    row: Selector,
    /// Field name and selector, in `BeerRecord` field order
    fields: Vec<(&'static str, Selector)>,
}

impl BeerRowExtractor {
    /// Create an extractor, compiling the configured selectors.
    pub fn new(selectors: &DetailSelectors) -> Result<Self> {
        let fields = selectors
            .fields()
            .into_iter()
            .map(|(name, selector)| Ok((name, parse_selector(selector)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            table: parse_selector(&selectors.table)?,
            row: parse_selector(&selectors.row)?,
            fields,
        })
    }

    /// Extract every complete product row of the first matching table.
    pub fn extract(&self, document: &Html) -> ExtractReport {
        let mut report = ExtractReport::default();

        let Some(table) = document.select(&self.table).next() else {
            return report;
        };

        for (index, row) in table.select(&self.row).enumerate() {
            match self.parse_row(&row) {
                Ok(beer) => report.beers.push(beer),
                Err(field) => report.diagnostics.push(Skipped::new(
                    Stage::Row,
                    format!("row {}", index + 1),
                    format!("missing field '{field}'"),
                )),
            }
        }

        report
    }

    /// Read all fields of a row, or name the first missing one.
    fn parse_row(&self, row: &ElementRef) -> std::result::Result<BeerRecord, &'static str> {
        let mut values = Vec::with_capacity(self.fields.len());
        for (name, selector) in &self.fields {
            let cell = row.select(selector).next().ok_or(*name)?;
            values.push(field_text(&cell));
        }

        let [title, brewery, price, size, abv, style, country]: [String; 7] =
            values.try_into().map_err(|_| "row")?;

        Ok(BeerRecord {
            title,
            brewery,
            price,
            size,
            abv,
            style,
            country,
        })
    }
}

/// Trimmed cell text up to the first line break.
///
/// Detail pages put secondary metadata (article number, packaging) on a
/// second line inside the same cell. Only the first line is kept, so a
/// template that moves the primary value below a line break will be
/// truncated silently.
fn field_text(cell: &ElementRef) -> String {
    let text: String = cell.text().collect();
    let text = text.trim();
    text.split('\n').next().unwrap_or_default().trim().to_string()
}
