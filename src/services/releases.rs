// src/services/releases.rs

//! Release assembly.
//!
//! Fetches the detail page of every candidate, extracts its beers and
//! turns non-empty results into [`Release`]s.

use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};
use scraper::Html;
use url::Url;

use crate::error::Result;
use crate::models::{Candidate, Config, Diagnostics, Release, ReleaseSet, Skipped, Stage};
use crate::services::BeerRowExtractor;
use crate::utils::http::DocumentFetcher;
use crate::utils::resolve_url;

/// Outcome of one candidate.
#[derive(Debug)]
pub struct CandidateReport {
    pub candidate: Candidate,
    pub outcome: std::result::Result<Release, Skipped>,
    /// Rows dropped while extracting the detail page
    pub diagnostics: Diagnostics,
}

impl CandidateReport {
    fn skipped(candidate: Candidate, reason: impl std::fmt::Display) -> Self {
        let skipped = Skipped::new(Stage::Candidate, candidate.link.clone(), reason);
        Self {
            candidate,
            outcome: Err(skipped),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Move every skip into `diagnostics` and return the release, if any.
    pub fn absorb(self, diagnostics: &mut Diagnostics) -> Option<Release> {
        diagnostics.extend(self.diagnostics);
        match self.outcome {
            Ok(release) => Some(release),
            Err(skipped) => {
                diagnostics.push(skipped);
                None
            }
        }
    }
}

/// Joins candidates with their detail page beers.
pub struct ReleaseAssembler {
    fetcher: Arc<dyn DocumentFetcher>,
    extractor: BeerRowExtractor,
    base_url: Option<Url>,
    concurrency: usize,
    request_delay: Duration,
}

impl ReleaseAssembler {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, extractor: BeerRowExtractor) -> Self {
        Self {
            fetcher,
            extractor,
            base_url: None,
            concurrency: 1,
            request_delay: Duration::ZERO,
        }
    }

    /// Build an assembler from the fetcher, calendar and detail settings.
    pub fn from_config(config: &Config, fetcher: Arc<dyn DocumentFetcher>) -> Result<Self> {
        let extractor = BeerRowExtractor::new(&config.detail)?;
        let assembler = Self::new(fetcher, extractor)
            .with_concurrency(config.fetcher.max_concurrent)
            .with_request_delay(Duration::from_millis(config.fetcher.request_delay_ms));

        let base = config.calendar.link_base();
        if base.is_empty() {
            return Ok(assembler);
        }
        Ok(assembler.with_base_url(Url::parse(base)?))
    }

    /// Resolve relative detail links against `base`.
    pub fn with_base_url(mut self, base: Url) -> Self {
        self.base_url = Some(base);
        self
    }

    /// Maximum number of detail pages fetched at once.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Minimum spacing between the starts of detail page requests.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Absolute URL fetched for a detail link.
    pub fn target_url(&self, link: &str) -> String {
        match &self.base_url {
            Some(base) => resolve_url(base, link),
            None => link.to_string(),
        }
    }

    /// Per-candidate reports in candidate order.
    ///
    /// Up to `concurrency` detail pages are fetched at once, but reports
    /// are yielded in the order the candidates were given. Successive
    /// requests start at least `request_delay` apart.
    pub fn reports(
        &self,
        candidates: Vec<Candidate>,
    ) -> impl Stream<Item = CandidateReport> + '_ {
        let delay = self.request_delay;
        stream::iter(candidates.into_iter().enumerate())
            .then(move |(index, candidate)| async move {
                if index > 0 && !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                candidate
            })
            .map(move |candidate| self.assemble_one(candidate))
            .buffered(self.concurrency)
    }

    /// Assemble all candidates into a date-ordered release set.
    pub async fn assemble(
        &self,
        candidates: Vec<Candidate>,
        diagnostics: &mut Diagnostics,
    ) -> ReleaseSet {
        let mut releases = Vec::new();
        let mut reports = pin!(self.reports(candidates));

        while let Some(report) = reports.next().await {
            if let Some(release) = report.absorb(diagnostics) {
                releases.push(release);
            }
        }

        ReleaseSet::from_unsorted(releases)
    }

    async fn assemble_one(&self, candidate: Candidate) -> CandidateReport {
        let url = self.target_url(&candidate.link);
        let body = match self.fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(error) => return CandidateReport::skipped(candidate, error),
        };

        let extracted = self.extractor.extract(&Html::parse_document(&body));
        if extracted.beers.is_empty() {
            let mut report = CandidateReport::skipped(candidate, "detail page has no beer rows");
            report.diagnostics = extracted.diagnostics;
            return report;
        }

        let release = Release {
            date: candidate.date,
            url: candidate.link.clone(),
            beers: extracted.beers,
        };

        CandidateReport {
            candidate,
            outcome: Ok(release),
            diagnostics: extracted.diagnostics,
        }
    }
}
