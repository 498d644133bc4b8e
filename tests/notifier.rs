use release_radar::{
    error::AppError,
    services::{Notifier, WebhookNotifier},
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

#[tokio::test]
async fn test_webhook_posts_text_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks/abc"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "text": "*IPA X*, Brewery Y" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let notifier =
        WebhookNotifier::new(reqwest::Client::new(), format!("{}/hooks/abc", server.uri()));
    notifier.notify("*IPA X*, Brewery Y").await.unwrap();
}

#[tokio::test]
async fn test_webhook_error_status_is_notify_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(reqwest::Client::new(), server.uri());
    let err = notifier.notify("hej").await.unwrap_err();

    match err {
        AppError::Notify(message) => assert!(message.contains("500"), "{message}"),
        other => panic!("expected notify error, got {other:?}"),
    }
}
