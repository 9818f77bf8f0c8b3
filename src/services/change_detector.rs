use crate::error::TrackerError;
use crate::models::Token;
use crate::services::price_store::{self, normalize_price};
use crate::AppState;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceChange {
    pub token: Token,
    pub old_price: f64,
    pub new_price: f64,
}

/// Exact inequality on the storage precision. No prior sample, no change.
pub fn detect(prior_price: Option<f64>, new_price: f64) -> Option<(f64, f64)> {
    let old = normalize_price(prior_price?);
    let new = normalize_price(new_price);

    if old == new {
        None
    } else {
        Some((old, new))
    }
}

/// Compare `new_price` against the most recent stored sample for `token`.
///
/// Must run before the cycle appends the new sample, otherwise the fresh
/// write would compare against itself.
pub async fn check(
    state: &AppState,
    token: Token,
    new_price: f64,
) -> Result<Option<PriceChange>, TrackerError> {
    let prior = price_store::most_recent(state, token).await?;

    Ok(
        detect(prior.map(|s| s.price), new_price).map(|(old_price, new_price)| PriceChange {
            token,
            old_price,
            new_price,
        }),
    )
}

/// Emit the change notification. Best effort: a send failure is logged and
/// never fails the cycle.
pub async fn notify(state: &AppState, change: &PriceChange) {
    tracing::info!(
        token = %change.token,
        old = change.old_price,
        new = change.new_price,
        "price changed",
    );

    let Some(to) = state.settings.change_notify_email.as_deref() else {
        return;
    };

    let subject = format!("Price Alert: {} Price Changed", change.token);
    let body = format!(
        "The price of {} has changed from ${:.2} to ${:.2}.",
        change.token, change.old_price, change.new_price
    );

    if let Err(e) = state.notifier.send(to, &subject, &body).await {
        tracing::error!(token = %change.token, "failed to send change notification: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::detect;

    #[test]
    fn no_prior_sample_means_no_change() {
        assert_eq!(detect(None, 1800.0), None);
    }

    #[test]
    fn equal_prices_mean_no_change() {
        assert_eq!(detect(Some(1800.00), 1800.00), None);
    }

    #[test]
    fn any_inequality_is_a_change() {
        assert_eq!(detect(Some(1800.00), 1800.01), Some((1800.00, 1800.01)));
    }

    #[test]
    fn float_noise_below_storage_precision_is_not_a_change() {
        assert_eq!(detect(Some(0.3), 0.1 + 0.2), None);
    }
}
