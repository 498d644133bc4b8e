// src/pipeline/pipeline.rs

use std::pin::pin;
use std::sync::Arc;

use futures::StreamExt;

use crate::error::Result;
use crate::models::{Config, DispatchMode, ReleaseSet, ReleaseSource, Stage};
use crate::services::{MessageFormatter, Notifier, ReleaseAssembler, ReleaseWindow};
use crate::utils::http::DocumentFetcher;
use crate::utils::log;

use super::api::collect_api;
use super::calendar::{collect_calendar, scan_calendar};
use super::dispatch::{DispatchOutcome, notify_all, notify_release};
use super::RunReport;

/// Per-run choices.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub source: ReleaseSource,
    pub mode: DispatchMode,
    /// Fixed once per run
    pub window: ReleaseWindow,
}

impl RunOptions {
    /// Options from configuration with a window starting at `today`.
    pub fn from_config(config: &Config, today: chrono::NaiveDate) -> Self {
        Self {
            source: config.run.source,
            mode: config.notifier.mode,
            window: ReleaseWindow::new(today, config.calendar.window_days),
        }
    }

    /// Dispatch mode the run actually uses.
    ///
    /// The product API returns all releases in one response, so immediate
    /// dispatch only applies to the calendar source.
    pub fn effective_mode(&self) -> DispatchMode {
        match (self.source, self.mode) {
            (ReleaseSource::Api, DispatchMode::Immediate) => DispatchMode::Batch,
            (_, mode) => mode,
        }
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub candidates: usize,
    pub releases: usize,
    pub beers: usize,
    pub skipped_lines: usize,
    pub skipped_rows: usize,
    pub skipped_candidates: usize,
    pub notified: usize,
    pub notify_failures: usize,
}

impl RunSummary {
    fn new(report: &RunReport, dispatch: DispatchOutcome) -> Self {
        let diagnostics = &report.diagnostics;
        Self {
            candidates: report.candidate_count,
            releases: report.releases.len(),
            beers: report.releases.beer_count(),
            skipped_lines: diagnostics.count(Stage::Heading) + diagnostics.count(Stage::Line),
            skipped_rows: diagnostics.count(Stage::Row),
            skipped_candidates: diagnostics.count(Stage::Candidate),
            notified: dispatch.sent,
            notify_failures: dispatch.failed,
        }
    }

    pub fn items(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Candidates", self.candidates.to_string()),
            ("Releases", self.releases.to_string()),
            ("Beers", self.beers.to_string()),
            ("Skipped lines", self.skipped_lines.to_string()),
            ("Skipped rows", self.skipped_rows.to_string()),
            ("Skipped candidates", self.skipped_candidates.to_string()),
            ("Notified", self.notified.to_string()),
            ("Notify failures", self.notify_failures.to_string()),
        ]
    }
}

/// Collect releases from the selected source without notifying.
pub async fn collect(
    config: &Config,
    fetcher: Arc<dyn DocumentFetcher>,
    options: &RunOptions,
) -> Result<RunReport> {
    match options.source {
        ReleaseSource::Calendar => collect_calendar(config, fetcher, &options.window).await,
        ReleaseSource::Api => collect_api(config, &options.window).await,
    }
}

/// Run the full pipeline: collect, notify, summarize.
pub async fn run_pipeline(
    config: &Config,
    fetcher: Arc<dyn DocumentFetcher>,
    notifier: &dyn Notifier,
    options: &RunOptions,
) -> Result<RunSummary> {
    log::header(&format!(
        "Release run: source={}, mode={}, window={}..{}",
        options.source,
        options.mode,
        options.window.today(),
        options.window.end()
    ));

    let formatter = MessageFormatter::new(&config.notifier, config.calendar.link_base());

    let mode = options.effective_mode();
    if mode != options.mode {
        ::log::warn!(
            "{} dispatch is not supported for the {} source; notifying in {} mode",
            options.mode,
            options.source,
            mode
        );
    }

    let (report, dispatch) = match mode {
        DispatchMode::Immediate => {
            run_immediate(config, fetcher, notifier, &formatter, &options.window).await?
        }
        DispatchMode::Batch => {
            let mut report = collect(config, fetcher, options).await?;
            let dispatch = notify_all(
                &report.releases,
                notifier,
                &formatter,
                &mut report.diagnostics,
            )
            .await;
            (report, dispatch)
        }
    };

    report.diagnostics.log_all();
    let summary = RunSummary::new(&report, dispatch);
    log::summary("Release run complete", &summary.items());

    Ok(summary)
}

/// Notify each calendar release as soon as it is assembled.
async fn run_immediate(
    config: &Config,
    fetcher: Arc<dyn DocumentFetcher>,
    notifier: &dyn Notifier,
    formatter: &MessageFormatter,
    window: &ReleaseWindow,
) -> Result<(RunReport, DispatchOutcome)> {
    let scan = scan_calendar(config, fetcher.as_ref(), window).await?;
    let assembler = ReleaseAssembler::from_config(config, fetcher)?;

    let mut diagnostics = scan.diagnostics;
    let mut dispatch = DispatchOutcome::default();
    let mut releases = Vec::new();
    let candidate_count = scan.candidates.len();

    let mut reports = pin!(assembler.reports(scan.candidates));
    while let Some(report) = reports.next().await {
        if let Some(release) = report.absorb(&mut diagnostics) {
            notify_release(&release, notifier, formatter, &mut dispatch, &mut diagnostics).await;
            releases.push(release);
        }
    }

    let report = RunReport {
        releases: ReleaseSet::from_unsorted(releases),
        diagnostics,
        candidate_count,
    };
    Ok((report, dispatch))
}
