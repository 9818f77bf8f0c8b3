use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::Token;

/// One observed (token, price, time) data point. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSample {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub token: Token,

    /// USD price, normalized to the storage precision (10 decimal places).
    pub price: f64,

    /// Epoch seconds.
    pub last_update: i64,
}

/// Average price over one wall-clock hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPrice {
    /// Epoch seconds of the start of the hour.
    pub hour: i64,
    pub avg_price: f64,
}
