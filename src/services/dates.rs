//! Calendar date resolution and the rolling release window.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone};

use crate::error::{AppError, ResolutionError, Result};
use crate::models::LocaleConfig;

/// Length of the release window when none is configured.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Lookup from lowercase localized month name to month number (1-12).
#[derive(Debug, Clone)]
pub struct MonthTable {
    months: HashMap<String, u32>,
}

impl MonthTable {
    /// Build a table from twelve names, January first.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        if names.len() != 12 {
            return Err(AppError::validation(format!(
                "month table needs 12 names, got {}",
                names.len()
            )));
        }

        let mut months = HashMap::with_capacity(12);
        for (index, name) in names.iter().enumerate() {
            let key = name.as_ref().trim().to_lowercase();
            if key.is_empty() {
                return Err(AppError::validation(format!(
                    "month {} has an empty name",
                    index + 1
                )));
            }
            if months.insert(key.clone(), index as u32 + 1).is_some() {
                return Err(AppError::validation(format!(
                    "month name '{key}' appears twice"
                )));
            }
        }

        Ok(Self { months })
    }

    /// Month number for a localized name, ignoring case.
    pub fn month(&self, name: &str) -> Option<u32> {
        self.months.get(&name.trim().to_lowercase()).copied()
    }

    /// Combine a section year with a line's month name and day.
    ///
    /// A single-digit day is zero-padded before the date is parsed.
    pub fn resolve(
        &self,
        year: i32,
        month_name: &str,
        day: &str,
    ) -> std::result::Result<NaiveDate, ResolutionError> {
        let month = self
            .month(month_name)
            .ok_or_else(|| ResolutionError::UnknownMonth(month_name.to_string()))?;

        let day = day.trim();
        let day = if day.len() < 2 {
            format!("0{day}")
        } else {
            day.to_string()
        };

        let text = format!("{year:04}-{month:02}-{day}");
        NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .map_err(|_| ResolutionError::MalformedDate(text))
    }
}

impl Default for MonthTable {
    fn default() -> Self {
        let months = LocaleConfig::default()
            .months
            .iter()
            .enumerate()
            .map(|(index, name)| (name.to_lowercase(), index as u32 + 1))
            .collect();
        Self { months }
    }
}

/// Open interval of days `(today, today + days)`.
///
/// Both ends are excluded: a release dated today or exactly `days` ahead
/// is never reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseWindow {
    today: NaiveDate,
    days: i64,
}

impl ReleaseWindow {
    pub fn new(today: NaiveDate, days: i64) -> Self {
        Self { today, days }
    }

    /// Window anchored at the calendar day of `now`.
    pub fn starting<Tz: TimeZone>(now: &DateTime<Tz>, days: i64) -> Self {
        Self::new(now.date_naive(), days)
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Exclusive upper bound.
    pub fn end(&self) -> NaiveDate {
        self.today + TimeDelta::days(self.days)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date > self.today && date < self.end()
    }
}

/// Whether `date` falls in the default seven-day window after `today`.
pub fn in_window(today: NaiveDate, date: NaiveDate) -> bool {
    ReleaseWindow::new(today, DEFAULT_WINDOW_DAYS).contains(date)
}
