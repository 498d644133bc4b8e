// src/services/calendar.rs

//! Calendar page scanner.
//!
//! Walks the year sections of a release calendar and emits a dated
//! candidate for every detail link on a line that falls inside the
//! release window.

use scraper::{ElementRef, Html, Selector};

use crate::error::Result;
use crate::models::{
    CalendarSelectors, Candidate, Config, Diagnostics, Skipped, Stage, TopicHeading,
};
use crate::services::{MonthTable, ReleaseWindow};
use crate::utils::{element_text, parse_selector};

/// Candidates found on a calendar page, plus the lines that were dropped.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Heading order, then line order, then link order
    pub candidates: Vec<Candidate>,
    pub diagnostics: Diagnostics,
}

/// Scanner for calendar pages laid out as year headings followed by
/// day/month lines.
pub struct CalendarScanner {
    months: MonthTable,
    year_heading: Selector,
    section_boundary: Selector,
    line: Selector,
    link: Selector,
    link_attr: String,
}

impl CalendarScanner {
    /// Create a scanner, compiling the configured selectors.
    pub fn new(selectors: &CalendarSelectors, months: MonthTable) -> Result<Self> {
        Ok(Self {
            months,
            year_heading: parse_selector(&selectors.year_heading)?,
            section_boundary: parse_selector(&selectors.section_boundary)?,
            line: parse_selector(&selectors.line)?,
            link: parse_selector(&selectors.link)?,
            link_attr: selectors.link_attr.clone(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.calendar.selectors,
            MonthTable::from_names(&config.locale.months)?,
        )
    }

    /// Scan a calendar document for in-window candidates.
    pub fn scan(&self, document: &Html, window: &ReleaseWindow) -> ScanReport {
        let mut report = ScanReport::default();

        for heading in document.select(&self.year_heading) {
            let text = element_text(&heading, "\n");
            let Some(topic) = TopicHeading::parse(&text) else {
                report.diagnostics.push(Skipped::new(
                    Stage::Heading,
                    collapse(&text),
                    "heading has no four-digit year",
                ));
                continue;
            };

            for line in self.section_lines(heading) {
                self.scan_line(&line, topic.year, window, &mut report);
            }
        }

        report
    }

    /// Lines between a year heading and the next heading of either tier.
    fn section_lines<'a>(&self, heading: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        let mut lines = Vec::new();

        for sibling in heading.next_siblings().filter_map(ElementRef::wrap) {
            if self.section_boundary.matches(&sibling) {
                break;
            }

            if self.line.matches(&sibling) {
                lines.push(sibling);
                continue;
            }

            // A wrapper holding the next heading ends the section inside it.
            if sibling.select(&self.section_boundary).next().is_some() {
                for element in sibling.descendants().filter_map(ElementRef::wrap) {
                    if self.section_boundary.matches(&element) {
                        break;
                    }
                    if self.line.matches(&element) {
                        lines.push(element);
                    }
                }
                break;
            }

            // Wrappers such as <ul> or <div> hold the lines one level down.
            let nested: Vec<_> = sibling.select(&self.line).collect();
            if nested.is_empty() {
                lines.push(sibling);
            } else {
                lines.extend(nested);
            }
        }

        lines
    }

    fn scan_line(
        &self,
        line: &ElementRef,
        year: i32,
        window: &ReleaseWindow,
        report: &mut ScanReport,
    ) {
        let text = element_text(line, " ");
        let Some((day, month)) = split_day_month(&text) else {
            return;
        };

        let date = match self.months.resolve(year, month, day) {
            Ok(date) => date,
            Err(error) => {
                report
                    .diagnostics
                    .push(Skipped::new(Stage::Line, collapse(&text), error));
                return;
            }
        };

        if !window.contains(date) {
            return;
        }

        for anchor in line.select(&self.link) {
            let Some(href) = anchor.value().attr(&self.link_attr) else {
                continue;
            };
            let href = href.trim();
            if !href.is_empty() {
                report.candidates.push(Candidate {
                    date,
                    link: href.to_string(),
                });
            }
        }
    }
}

/// Split a line into its leading day and month tokens.
///
/// Returns `None` for lines that do not start with a numeric day followed
/// by a word.
fn split_day_month(text: &str) -> Option<(&str, &str)> {
    let mut tokens = text.split_whitespace();
    let day = tokens.next()?.trim_end_matches('.');
    let month = tokens
        .next()?
        .trim_end_matches(|c: char| !c.is_alphabetic());

    if day.is_empty() || !day.chars().all(|c| c.is_ascii_digit()) || month.is_empty() {
        return None;
    }

    Some((day, month))
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
