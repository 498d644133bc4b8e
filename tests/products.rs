use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use release_radar::{
    error::{AppError, Result},
    models::{ApiConfig, Config, DispatchMode, Diagnostics, ReleaseSource, Stage},
    pipeline::{self, RunOptions},
    services::{Notifier, ProductApiClient, ReleaseWindow},
    utils::http::{DocumentFetcher, HttpFetcher},
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        url: format!("{}/search", server.uri()),
        subscription_key: "secret".to_string(),
        search_page_url: "https://shop.example/sok?from={from}&to={to}".to_string(),
        ..ApiConfig::default()
    }
}

fn hit(name: &str, date: &str) -> serde_json::Value {
    json!({
        "ProductId": name,
        "ProductNameBold": name,
        "ProducerName": "Brewery Y",
        "Price": 45.0,
        "Volume": 330.0,
        "AlcoholPercentage": 6.0,
        "Style": "IPA",
        "Country": "Sverige",
        "SellStartDate": date,
    })
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn window() -> ReleaseWindow {
    ReleaseWindow::new("2025-08-02".parse().unwrap(), 7)
}

#[tokio::test]
async fn test_search_sends_filters_and_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(header("Ocp-Apim-Subscription-Key", "secret"))
        .and(query_param("AssortmentText", "Lokalt & Småskaligt"))
        .and(query_param("SellStartDateFrom", "2025-08-02"))
        .and(query_param("SellStartDateTo", "2025-08-09"))
        .and(query_param("SubCategory", "Öl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Hits": [hit("IPA X", "2025-08-05T00:00:00")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProductApiClient::new(reqwest::Client::new(), api_config(&server));
    let products = client.search(&window()).await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].product_name_bold, "IPA X");
}

#[tokio::test]
async fn test_releases_grouped_by_sell_start() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Hits": [
                hit("Late", "2025-08-06T00:00:00"),
                hit("Early", "2025-08-04"),
                hit("Also early", "2025-08-04T00:00:00"),
                hit("Broken", "snart"),
            ]
        })))
        .mount(&server)
        .await;

    let client = ProductApiClient::new(reqwest::Client::new(), api_config(&server));
    let mut diagnostics = Diagnostics::new();
    let releases = client.releases(&window(), &mut diagnostics).await.unwrap();

    let summary: Vec<(String, Vec<&str>)> = releases
        .iter()
        .map(|r| {
            (
                r.date.to_string(),
                r.beers.iter().map(|b| b.title.as_str()).collect(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("2025-08-04".to_string(), vec!["Early", "Also early"]),
            ("2025-08-06".to_string(), vec!["Late"]),
        ]
    );
    assert_eq!(
        releases.iter().next().unwrap().url,
        "https://shop.example/sok?from=2025-08-04&to=2025-08-04"
    );
    assert_eq!(diagnostics.count(Stage::Row), 1);
}

#[tokio::test]
async fn test_rejected_key_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = ProductApiClient::new(reqwest::Client::new(), api_config(&server));
    let err = client.search(&window()).await.unwrap_err();

    assert!(matches!(err, AppError::Fetch { .. }));
}

#[tokio::test]
async fn test_api_source_through_pipeline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Hits": [hit("IPA X", "2025-08-05T00:00:00")]
        })))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.api = api_config(&server);
    let options = RunOptions {
        source: ReleaseSource::Api,
        mode: DispatchMode::Batch,
        window: window(),
    };
    let fetcher: Arc<dyn DocumentFetcher> =
        Arc::new(HttpFetcher::from_config(&config.fetcher).unwrap());

    let report = pipeline::collect(&config, fetcher, &options).await.unwrap();

    assert_eq!(report.releases.len(), 1);
    assert_eq!(report.releases.beer_count(), 1);
    assert!(report.diagnostics.is_empty());
}

#[tokio::test]
async fn test_api_source_with_immediate_mode_notifies_in_date_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Hits": [
                hit("Late", "2025-08-06T00:00:00"),
                hit("Early", "2025-08-04T00:00:00"),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.api = api_config(&server);
    let options = RunOptions {
        source: ReleaseSource::Api,
        mode: DispatchMode::Immediate,
        window: window(),
    };
    let fetcher: Arc<dyn DocumentFetcher> =
        Arc::new(HttpFetcher::from_config(&config.fetcher).unwrap());
    let notifier = RecordingNotifier::default();

    let summary = pipeline::run_pipeline(&config, fetcher, &notifier, &options)
        .await
        .unwrap();

    assert_eq!(summary.releases, 2);
    assert_eq!(summary.notified, 2);
    let messages = notifier.messages.lock().unwrap();
    assert!(messages[0].contains("(2025-08-04)"));
    assert!(messages[1].contains("(2025-08-06)"));
}
