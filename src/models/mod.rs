// src/models/mod.rs

//! Domain models for the release watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod diagnostics;
mod release;
mod selectors;

// Re-export all public types
pub use config::{
    ApiConfig, CalendarConfig, Config, DispatchMode, FetcherConfig, LocaleConfig, NotifierConfig,
    ReleaseSource, RunConfig,
};
pub use diagnostics::{Diagnostics, Skipped, Stage};
pub use release::{BeerRecord, Candidate, Release, ReleaseSet, TopicHeading};
pub use selectors::{CalendarSelectors, DetailSelectors};
