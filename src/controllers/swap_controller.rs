use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{services::swap_service, AppState};

#[derive(Deserialize)]
pub struct SwapQuery {
    pub amount: Option<f64>,
}

// GET /api/swap/rate?amount=<eth>
pub async fn get_swap_rate(
    State(state): State<AppState>,
    Query(query): Query<SwapQuery>,
) -> Response {
    let Some(amount) = query.amount else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing required query parameter: amount" })),
        )
            .into_response();
    };

    if !amount.is_finite() || amount <= 0.0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Amount must be a positive number" })),
        )
            .into_response();
    }

    match swap_service::swap_rate(&state, amount).await {
        Ok(quote) => (StatusCode::OK, Json(quote)).into_response(),
        Err(e) => {
            tracing::error!("swap rate unavailable: {e}");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "Price source unavailable" })),
            )
                .into_response()
        }
    }
}
