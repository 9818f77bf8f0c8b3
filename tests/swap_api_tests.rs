use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use http_body_util::BodyExt;
use mongodb::Client;
use tokenwatch::controllers::swap_controller;
use tokenwatch::services::{moralis::MoralisClient, notifier::NoopNotifier};
use tokenwatch::{config, AppState};
use tower::ServiceExt;

async fn test_state() -> AppState {
    let mut settings = config::load();
    settings.moralis_api_key = String::new();

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

fn swap_app(state: AppState) -> Router {
    Router::new()
        .route("/api/swap/rate", get(swap_controller::get_swap_rate))
        .with_state(state)
}

fn get_request(uri: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

#[tokio::test]
async fn swap_rate_without_amount_returns_400() {
    let app = swap_app(test_state().await);

    let res = app.oneshot(get_request("/api/swap/rate")).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("amount"));
}

#[tokio::test]
async fn swap_rate_with_non_positive_amount_returns_400() {
    let app = swap_app(test_state().await);

    let res = app
        .oneshot(get_request("/api/swap/rate?amount=0"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("positive"));
}

#[tokio::test]
async fn swap_rate_without_price_source_returns_502() {
    // empty MORALIS_API_KEY: the source errors before any network call
    let app = swap_app(test_state().await);

    let res = app
        .oneshot(get_request("/api/swap/rate?amount=1.5"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    let body = response_body_string(res).await;
    assert!(body.contains("Price source unavailable"));
}
