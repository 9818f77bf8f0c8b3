use chrono::Utc;
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};

use crate::error::TrackerError;
use crate::models::{PriceAlert, Token};
use crate::AppState;

const COLLECTION: &str = "price_alerts";

/// Default match tolerance: ±1% of the current price.
pub const ALERT_BAND: f64 = 0.01;

/// Inclusive band around the current price. The band floats with the
/// market, not with the target.
pub fn band_bounds(current_price: f64, band: f64) -> (f64, f64) {
    (current_price * (1.0 - band), current_price * (1.0 + band))
}

pub fn band_contains(current_price: f64, target_price: f64, band: f64) -> bool {
    let (lo, hi) = band_bounds(current_price, band);
    lo <= target_price && target_price <= hi
}

/// Store a new rule. Input validation (symbol set, positive target, email
/// syntax) happens at the API boundary before this is reached.
pub async fn create(
    state: &AppState,
    token: Token,
    target_price: f64,
    email: &str,
) -> Result<PriceAlert, TrackerError> {
    let alerts = state.db.collection::<PriceAlert>(COLLECTION);

    let alert = PriceAlert {
        id: ObjectId::new(),
        token,
        target_price,
        email: email.to_string(),
        triggered: false,
        triggered_at: None,
        created_at: Utc::now().timestamp(),
    };

    alerts.insert_one(&alert, None).await?;

    Ok(alert)
}

/// Flip every untriggered rule for `token` whose target sits inside the
/// band, and return exactly the rules this call flipped.
///
/// The eligibility check and the flip are one conditional update per rule:
/// the filter re-asserts `triggered: false` and the band, so of two
/// concurrent cycles only one can observe `modified_count == 1` and become
/// responsible for the notification. The candidate scan is just an
/// optimization over scanning the whole collection.
pub async fn match_and_trigger(
    state: &AppState,
    token: Token,
    current_price: f64,
    band: f64,
) -> Result<Vec<PriceAlert>, TrackerError> {
    let alerts = state.db.collection::<PriceAlert>(COLLECTION);

    let (lo, hi) = band_bounds(current_price, band);
    let in_band = doc! { "$gte": lo, "$lte": hi };

    // 1) Candidate scan
    let mut cursor = alerts
        .find(
            doc! {
                "token": token.as_str(),
                "triggered": false,
                "target_price": in_band.clone(),
            },
            None,
        )
        .await?;

    let mut candidates: Vec<PriceAlert> = Vec::new();
    while let Some(res) = cursor.next().await {
        candidates.push(res?);
    }

    // 2) Atomic flip per candidate; losing the race means zero rows
    //    modified and no notification from this cycle.
    let now = Utc::now().timestamp();
    let mut flipped = Vec::new();

    for mut alert in candidates {
        let res = alerts
            .update_one(
                doc! {
                    "_id": alert.id,
                    "triggered": false,
                    "target_price": in_band.clone(),
                },
                doc! { "$set": { "triggered": true, "triggered_at": now } },
                None,
            )
            .await;

        match res {
            Ok(r) if r.modified_count == 1 => {
                alert.triggered = true;
                alert.triggered_at = Some(now);
                flipped.push(alert);
            }
            Ok(_) => {
                // already flipped by a concurrent cycle
            }
            Err(e) => {
                tracing::warn!(alert_id = %alert.id, "alert flip failed, will retry next cycle: {e}");
            }
        }
    }

    Ok(flipped)
}

#[cfg(test)]
mod tests {
    use super::{band_bounds, band_contains, ALERT_BAND};

    #[test]
    fn target_within_one_percent_matches() {
        // current 100.5 => band [99.495, 101.505]
        assert!(band_contains(100.5, 100.0, ALERT_BAND));
    }

    #[test]
    fn target_below_band_does_not_match() {
        // current 102 => band low is 100.98, above the 100 target
        assert!(!band_contains(102.0, 100.0, ALERT_BAND));
    }

    #[test]
    fn band_is_inclusive_at_both_edges() {
        let (lo, hi) = band_bounds(200.0, ALERT_BAND);
        assert!(band_contains(200.0, lo, ALERT_BAND));
        assert!(band_contains(200.0, hi, ALERT_BAND));
        assert!(!band_contains(200.0, hi + 0.01, ALERT_BAND));
    }
}
