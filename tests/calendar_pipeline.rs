use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use release_radar::{
    error::{AppError, Result},
    models::{Config, DispatchMode, ReleaseSource, Stage},
    pipeline::{self, RunOptions},
    services::Notifier,
    utils::http::{DocumentFetcher, HttpFetcher},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Notifier that records every message and fails on messages containing
/// `fail_on`.
#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        if let Some(marker) = &self.fail_on {
            if text.contains(marker.as_str()) {
                return Err(AppError::notify("webhook returned 500"));
            }
        }
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.to_string())
        .insert_header("Content-Type", "text/html; charset=utf-8")
}

fn detail_page(rows: &[(&str, &str)]) -> String {
    let rows: String = rows
        .iter()
        .map(|(title, brewery)| {
            format!(
                r#"<tr>
                    <td class="title">{title}
                        Art.nr 1234</td>
                    <td class="brewery">{brewery}</td>
                    <td class="price">45</td>
                    <td class="size">33cl</td>
                    <td class="abv">6%</td>
                    <td class="type">IPA</td>
                    <td class="country">SE</td>
                </tr>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><table>
            <thead><tr><th>Namn</th><th>Bryggeri</th></tr></thead>
            <tbody>{rows}</tbody>
        </table></body></html>"#
    )
}

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.calendar.url = format!("{}/kalender", server.uri());
    config.fetcher.timeout_secs = 5;
    config
}

fn options(config: &Config, mode: DispatchMode) -> RunOptions {
    RunOptions {
        mode,
        ..RunOptions::from_config(config, "2025-08-02".parse().unwrap())
    }
}

fn fetcher(config: &Config) -> Arc<dyn DocumentFetcher> {
    Arc::new(HttpFetcher::from_config(&config.fetcher).unwrap())
}

async fn mount(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_release_end_to_end() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/kalender",
        r#"<html><body>
            <h2>Premiär
            2025</h2>
            <p>5 augusti <a href="/release/42">Augustisläppet</a></p>
        </body></html>"#,
    )
    .await;
    mount(&server, "/release/42", &detail_page(&[("IPA X", "Brewery Y")])).await;

    let config = config_for(&server);
    let report = pipeline::collect(&config, fetcher(&config), &options(&config, DispatchMode::Batch))
        .await
        .unwrap();

    let releases: Vec<_> = report.releases.into_iter().collect();
    assert_eq!(releases.len(), 1);
    assert_eq!(releases[0].date.to_string(), "2025-08-05");
    assert_eq!(releases[0].url, "/release/42");
    assert_eq!(releases[0].beers.len(), 1);

    let beer = &releases[0].beers[0];
    assert_eq!(beer.title, "IPA X");
    assert_eq!(beer.brewery, "Brewery Y");
    assert_eq!(beer.price, "45");
    assert_eq!(beer.size, "33cl");
    assert_eq!(beer.abv, "6%");
    assert_eq!(beer.style, "IPA");
    assert_eq!(beer.country, "SE");
    assert!(report.diagnostics.is_empty());
}

#[tokio::test]
async fn test_batch_run_notifies_in_date_order() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/kalender",
        r#"<html><body>
            <h2>Premiär
            2025</h2>
            <p>6 augusti <a href="/release/late">Senare</a></p>
            <p>4 augusti <a href="/release/early">Tidigare</a> <a href="/release/empty">Tom</a></p>
            <p>5 augusti <a href="/release/missing">Saknas</a></p>
            <p>20 augusti <a href="/release/far">Långt bort</a></p>
        </body></html>"#,
    )
    .await;
    mount(&server, "/release/late", &detail_page(&[("Late IPA", "B1")])).await;
    mount(&server, "/release/early", &detail_page(&[("Early Stout", "B2")])).await;
    mount(&server, "/release/empty", &detail_page(&[])).await;

    let config = config_for(&server);
    let notifier = RecordingNotifier::default();
    let summary = pipeline::run_pipeline(
        &config,
        fetcher(&config),
        &notifier,
        &options(&config, DispatchMode::Batch),
    )
    .await
    .unwrap();

    assert_eq!(summary.candidates, 4);
    assert_eq!(summary.releases, 2);
    assert_eq!(summary.skipped_candidates, 2);
    assert_eq!(summary.notified, 2);

    let messages = notifier.messages.lock().unwrap();
    assert!(messages[0].contains("(2025-08-04)"));
    assert!(messages[0].contains("*Early Stout*, B2, 45 SEK"));
    assert!(messages[0].contains(&format!("{}/release/early", server.uri())));
    assert!(messages[1].contains("(2025-08-06)"));
}

#[tokio::test]
async fn test_immediate_run_notifies_in_scan_order() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/kalender",
        r#"<html><body>
            <h2>Premiär
            2025</h2>
            <p>6 augusti <a href="/release/late">Senare</a></p>
            <p>4 augusti <a href="/release/early">Tidigare</a></p>
        </body></html>"#,
    )
    .await;
    mount(&server, "/release/late", &detail_page(&[("Late IPA", "B1")])).await;
    mount(&server, "/release/early", &detail_page(&[("Early Stout", "B2")])).await;

    let config = config_for(&server);
    let notifier = RecordingNotifier::default();
    let summary = pipeline::run_pipeline(
        &config,
        fetcher(&config),
        &notifier,
        &options(&config, DispatchMode::Immediate),
    )
    .await
    .unwrap();

    assert_eq!(summary.notified, 2);
    let messages = notifier.messages.lock().unwrap();
    assert!(messages[0].contains("(2025-08-06)"));
    assert!(messages[1].contains("(2025-08-04)"));
}

#[tokio::test]
async fn test_notify_failure_does_not_stop_run() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/kalender",
        r#"<html><body>
            <h2>Premiär
            2025</h2>
            <p>4 augusti <a href="/release/a">A</a></p>
            <p>5 augusti <a href="/release/b">B</a></p>
        </body></html>"#,
    )
    .await;
    mount(&server, "/release/a", &detail_page(&[("Alpha", "B1")])).await;
    mount(&server, "/release/b", &detail_page(&[("Beta", "B2")])).await;

    let config = config_for(&server);
    let notifier = RecordingNotifier {
        fail_on: Some("Alpha".to_string()),
        ..RecordingNotifier::default()
    };
    let summary = pipeline::run_pipeline(
        &config,
        fetcher(&config),
        &notifier,
        &options(&config, DispatchMode::Batch),
    )
    .await
    .unwrap();

    assert_eq!(summary.notified, 1);
    assert_eq!(summary.notify_failures, 1);
    assert_eq!(notifier.messages.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_calendar_fetch_failure_fails_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kalender"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let result =
        pipeline::collect(&config, fetcher(&config), &options(&config, DispatchMode::Batch)).await;

    assert!(matches!(result, Err(AppError::Fetch { .. })));
}

#[tokio::test]
async fn test_scan_only_counts_bad_lines() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/kalender",
        r#"<html><body>
            <h2>Premiär
            2025</h2>
            <p>5 smarch <a href="/release/1">?</a></p>
            <p>Fler släpp kommer</p>
        </body></html>"#,
    )
    .await;

    let config = config_for(&server);
    let report = pipeline::collect(&config, fetcher(&config), &options(&config, DispatchMode::Batch))
        .await
        .unwrap();

    assert!(report.releases.is_empty());
    assert_eq!(report.candidate_count, 0);
    assert_eq!(report.diagnostics.count(Stage::Line), 1);
}

#[test]
fn test_options_follow_config() {
    let mut config = Config::default();
    config.run.source = ReleaseSource::Api;
    config.notifier.mode = DispatchMode::Immediate;
    config.calendar.window_days = 3;

    let options = RunOptions::from_config(&config, "2025-08-02".parse().unwrap());
    assert_eq!(options.source, ReleaseSource::Api);
    assert_eq!(options.mode, DispatchMode::Immediate);
    assert_eq!(options.window.end().to_string(), "2025-08-05");
}
