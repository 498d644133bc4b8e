// src/pipeline/calendar.rs

//! Calendar page collection.

use std::sync::Arc;

use scraper::Html;

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::RunReport;
use crate::services::{CalendarScanner, ReleaseAssembler, ReleaseWindow, ScanReport};
use crate::utils::http::DocumentFetcher;

/// Fetch the calendar page and scan it for in-window candidates.
///
/// A failed calendar fetch fails the run.
pub async fn scan_calendar(
    config: &Config,
    fetcher: &dyn DocumentFetcher,
    window: &ReleaseWindow,
) -> Result<ScanReport> {
    let scanner = CalendarScanner::from_config(config)?;

    log::info!("Fetching calendar page {}", config.calendar.url);
    let body = fetcher.fetch(&config.calendar.url).await?;

    let report = scanner.scan(&Html::parse_document(&body), window);
    log::info!(
        "Found {} candidate(s) between {} and {}",
        report.candidates.len(),
        window.today(),
        window.end()
    );
    Ok(report)
}

/// Scan the calendar and assemble every candidate into a release set.
pub async fn collect_calendar(
    config: &Config,
    fetcher: Arc<dyn DocumentFetcher>,
    window: &ReleaseWindow,
) -> Result<RunReport> {
    let scan = scan_calendar(config, fetcher.as_ref(), window).await?;
    let assembler = ReleaseAssembler::from_config(config, fetcher)?;

    let mut diagnostics = scan.diagnostics;
    let candidate_count = scan.candidates.len();
    let releases = assembler.assemble(scan.candidates, &mut diagnostics).await;

    Ok(RunReport {
        releases,
        diagnostics,
        candidate_count,
    })
}
