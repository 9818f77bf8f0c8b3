use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::Token;

/// A user-registered threshold alert.
///
/// `triggered` flips false -> true exactly once, by the matcher's
/// conditional update, and never flips back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceAlert {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub token: Token,
    pub target_price: f64,
    pub email: String,

    pub triggered: bool,
    pub triggered_at: Option<i64>,

    pub created_at: i64,
}
