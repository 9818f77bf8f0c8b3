use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use mongodb::bson::doc;
use serde_json::json;

use crate::AppState;

pub async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "Token price tracker API",
        "endpoints": {
            "GET /api/prices/hourly": "Hourly average prices for the last 24 hours",
            "GET /api/swap/rate?amount=<eth>": "ETH -> BTC conversion at spot",
            "POST /api/alerts": "Set price alert with body: { token, targetPrice, email }",
        }
    }))
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn health_db(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.run_command(doc! { "ping": 1 }, None).await {
        Ok(_) => (StatusCode::OK, "mongo: ok").into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("mongo error: {e}"),
        )
            .into_response(),
    }
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
