//! Service layer for the release watcher.
//!
//! This module contains the business logic for:
//! - Date resolution and the release window (`MonthTable`, `ReleaseWindow`)
//! - Calendar scanning (`CalendarScanner`)
//! - Detail page extraction (`BeerRowExtractor`)
//! - Release assembly (`ReleaseAssembler`)
//! - The structured product API (`ProductApiClient`)
//! - Notification delivery (`Notifier`, `MessageFormatter`)

mod beers;
mod calendar;
mod dates;
mod notifier;
mod products;
mod releases;

pub use beers::{BeerRowExtractor, ExtractReport};
pub use calendar::{CalendarScanner, ScanReport};
pub use dates::{DEFAULT_WINDOW_DAYS, MonthTable, ReleaseWindow, in_window};
pub use notifier::{ConsoleNotifier, MessageFormatter, Notifier, WebhookNotifier};
pub use products::{Product, ProductApiClient};
pub use releases::{CandidateReport, ReleaseAssembler};
