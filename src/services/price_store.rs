use std::collections::BTreeMap;

use chrono::Utc;
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::FindOneOptions;

use crate::error::TrackerError;
use crate::models::{HourlyPrice, PriceSample, Token};
use crate::AppState;

const COLLECTION: &str = "token_prices";

/// Storage precision: 10 decimal places, the numeric(20,10) of the schema.
pub fn normalize_price(price: f64) -> f64 {
    (price * 1e10).round() / 1e10
}

/// Append one sample for `token`. The stored price is normalized so later
/// equality checks see exactly what the store holds.
pub async fn append(state: &AppState, token: Token, price: f64) -> Result<PriceSample, TrackerError> {
    let samples = state.db.collection::<PriceSample>(COLLECTION);

    let sample = PriceSample {
        id: ObjectId::new(),
        token,
        price: normalize_price(price),
        last_update: Utc::now().timestamp(),
    };

    samples.insert_one(&sample, None).await?;

    Ok(sample)
}

/// Most recent sample for `token`, or None if nothing was ever stored.
pub async fn most_recent(state: &AppState, token: Token) -> Result<Option<PriceSample>, TrackerError> {
    let samples = state.db.collection::<PriceSample>(COLLECTION);

    let opts = FindOneOptions::builder()
        .sort(doc! { "last_update": -1 })
        .build();

    let sample = samples
        .find_one(doc! { "token": token.as_str() }, opts)
        .await?;

    Ok(sample)
}

/// Per-hour average prices for `token` over the trailing window, newest
/// bucket first. An empty window yields an empty vec, not an error.
pub async fn hourly_averages(
    state: &AppState,
    token: Token,
    window_hours: i64,
) -> Result<Vec<HourlyPrice>, TrackerError> {
    let samples = state.db.collection::<PriceSample>(COLLECTION);
    let cutoff = Utc::now().timestamp() - window_hours * 3600;

    let mut cursor = samples
        .find(
            doc! { "token": token.as_str(), "last_update": { "$gte": cutoff } },
            None,
        )
        .await?;

    let mut rows: Vec<PriceSample> = Vec::new();
    while let Some(res) = cursor.next().await {
        rows.push(res?);
    }

    Ok(bucket_hourly(&rows))
}

/// Truncate each sample's timestamp to the hour and average per bucket.
fn bucket_hourly(samples: &[PriceSample]) -> Vec<HourlyPrice> {
    let mut buckets: BTreeMap<i64, (f64, u32)> = BTreeMap::new();

    for s in samples {
        let hour = s.last_update - s.last_update.rem_euclid(3600);
        let entry = buckets.entry(hour).or_insert((0.0, 0));
        entry.0 += s.price;
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .rev()
        .map(|(hour, (sum, count))| HourlyPrice {
            hour,
            avg_price: sum / count as f64,
        })
        .collect()
}
