// src/pipeline/dispatch.rs

//! Hands releases to the notifier.

use crate::models::{Diagnostics, Release, Skipped, Stage};
use crate::services::{MessageFormatter, Notifier};

/// Delivery counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub sent: usize,
    pub failed: usize,
}

/// Format and deliver one release. Failures are recorded, not retried.
pub async fn notify_release(
    release: &Release,
    notifier: &dyn Notifier,
    formatter: &MessageFormatter,
    outcome: &mut DispatchOutcome,
    diagnostics: &mut Diagnostics,
) {
    let text = formatter.format_release(release);
    match notifier.notify(&text).await {
        Ok(()) => {
            outcome.sent += 1;
            log::info!(
                "Notified release {} ({} beer(s))",
                release.date,
                release.beers.len()
            );
        }
        Err(error) => {
            outcome.failed += 1;
            log::error!("Failed to notify release {}: {}", release.url, error);
            diagnostics.push(Skipped::new(Stage::Notify, release.url.clone(), error));
        }
    }
}

/// Deliver releases one message at a time, in the given order.
pub async fn notify_all<'a>(
    releases: impl IntoIterator<Item = &'a Release>,
    notifier: &dyn Notifier,
    formatter: &MessageFormatter,
    diagnostics: &mut Diagnostics,
) -> DispatchOutcome {
    let mut outcome = DispatchOutcome::default();
    for release in releases {
        notify_release(release, notifier, formatter, &mut outcome, diagnostics).await;
    }
    outcome
}
