use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use regex::Regex;
use serde::Deserialize;
use serde_json::json;

use crate::{models::Token, services::alert_store, AppState};

#[derive(Deserialize)]
pub struct CreateAlertBody {
    pub token: Option<String>,

    #[serde(rename = "targetPrice")]
    pub target_price: Option<f64>,

    pub email: Option<String>,
}

fn is_valid_email(s: &str) -> bool {
    let s = s.trim();
    let re = Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_{|}~-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)+$")
        .unwrap();
    re.is_match(s)
}

fn reject(error: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": error }))).into_response()
}

// POST /api/alerts
pub async fn post_create_alert(
    State(state): State<AppState>,
    Json(body): Json<CreateAlertBody>,
) -> Response {
    // Every constraint is checked here, before any row can be stored.
    let (Some(token), Some(target_price), Some(email)) =
        (body.token.as_deref(), body.target_price, body.email.as_deref())
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Missing required fields",
                "required": ["token", "targetPrice", "email"],
            })),
        )
            .into_response();
    };

    let Some(token) = Token::parse(token) else {
        return reject("Invalid token. Supported tokens are ETH and MATIC");
    };

    if !target_price.is_finite() || target_price <= 0.0 {
        return reject("Target price must be a positive number");
    }

    if !is_valid_email(email) {
        return reject("Invalid email format");
    }

    let alert = match alert_store::create(&state, token, target_price, email.trim()).await {
        Ok(a) => a,
        Err(e) => {
            tracing::error!("failed to create alert: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response();
        }
    };

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Price alert created successfully",
            "alert": {
                "id": alert.id.to_hex(),
                "token": alert.token,
                "targetPrice": alert.target_price,
                "email": alert.email,
                "created_at": alert.created_at,
            }
        })),
    )
        .into_response()
}
