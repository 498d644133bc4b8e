//! Pipeline entry points.
//!
//! - `collect`: Gather releases from the calendar page or the product API
//! - `run_pipeline`: Collect releases and notify them in the configured mode

pub mod api;
pub mod calendar;
pub mod dispatch;
#[allow(clippy::module_inception)]
pub mod pipeline;

use crate::models::{Diagnostics, ReleaseSet};

pub use api::collect_api;
pub use calendar::{collect_calendar, scan_calendar};
pub use dispatch::{DispatchOutcome, notify_all};
pub use pipeline::{RunOptions, RunSummary, collect, run_pipeline};

/// Releases collected by one run and the units skipped on the way.
#[derive(Debug, Default)]
pub struct RunReport {
    pub releases: ReleaseSet,
    pub diagnostics: Diagnostics,
    /// Candidates considered before detail pages were checked
    pub candidate_count: usize,
}
