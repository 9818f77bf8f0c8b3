use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{TimeZone, Utc};
use serde_json::json;

use crate::{models::Token, services::price_store, AppState};

const WINDOW_HOURS: i64 = 24;

fn hour_label(bucket: i64) -> String {
    match Utc.timestamp_opt(bucket, 0).single() {
        Some(dt) => dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        None => bucket.to_string(),
    }
}

// GET /api/prices/hourly
pub async fn get_hourly_prices(State(state): State<AppState>) -> Response {
    let mut rows: Vec<(i64, serde_json::Value)> = Vec::new();

    for token in Token::ALL {
        let hours = match price_store::hourly_averages(&state, token, WINDOW_HOURS).await {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(token = %token, "failed to read hourly prices: {e}");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response();
            }
        };

        for h in hours {
            rows.push((
                h.hour,
                json!({
                    "token": token,
                    "hour": hour_label(h.hour),
                    "avg_price": h.avg_price,
                }),
            ));
        }
    }

    // newest hour first across tokens, matching the store's per-token order
    rows.sort_by(|a, b| b.0.cmp(&a.0));

    let body: Vec<serde_json::Value> = rows.into_iter().map(|(_, v)| v).collect();

    (StatusCode::OK, Json(json!(body))).into_response()
}
