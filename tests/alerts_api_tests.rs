use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, Request, StatusCode},
    routing::post,
    Router,
};
use http_body_util::BodyExt;
use mongodb::Client;
use tokenwatch::controllers::alerts_controller;
use tokenwatch::services::{moralis::MoralisClient, notifier::NoopNotifier};
use tokenwatch::{config, AppState};
use tower::ServiceExt;

async fn test_state() -> AppState {
    let mut settings = config::load();
    settings.moralis_api_key = String::new();
    settings.change_notify_email = None;

    // client construction is lazy; these tests only hit paths that reject
    // before any store access
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("mongodb client");
    let db = client.database(&settings.mongodb_db);

    let price_source = Arc::new(
        MoralisClient::new(String::new(), Duration::from_secs(1)).expect("moralis client"),
    );

    AppState {
        db,
        settings,
        price_source,
        notifier: Arc::new(NoopNotifier),
    }
}

async fn response_body_string(res: axum::response::Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

fn alerts_app(state: AppState) -> Router {
    Router::new()
        .route("/api/alerts", post(alerts_controller::post_create_alert))
        .with_state(state)
}

fn json_request(body: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("POST")
        .uri("/api/alerts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn create_alert_with_missing_fields_returns_400() {
    let app = alerts_app(test_state().await);

    let res = app
        .oneshot(json_request(r#"{ "token": "ETH" }"#))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("Missing required fields"));
}

#[tokio::test]
async fn create_alert_with_unsupported_token_returns_400() {
    let app = alerts_app(test_state().await);

    let res = app
        .oneshot(json_request(
            r#"{ "token": "DOGE", "targetPrice": 100.0, "email": "user@example.com" }"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("Supported tokens are ETH and MATIC"));
}

#[tokio::test]
async fn create_alert_with_negative_target_price_returns_400() {
    let app = alerts_app(test_state().await);

    let res = app
        .oneshot(json_request(
            r#"{ "token": "ETH", "targetPrice": -5, "email": "user@example.com" }"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("Target price must be a positive number"));
}

#[tokio::test]
async fn create_alert_with_invalid_email_returns_400() {
    let app = alerts_app(test_state().await);

    let res = app
        .oneshot(json_request(
            r#"{ "token": "MATIC", "targetPrice": 1.5, "email": "not-an-email" }"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("Invalid email format"));
}
