use crate::error::TrackerError;
use crate::models::Token;
use crate::services::{alert_store, change_detector, price_store};
use crate::AppState;

/// One full tick: fetch -> store -> detect -> match, for every supported
/// token. Errors abort the remainder of the tick; the scheduler keeps
/// ticking regardless.
pub async fn run_cycle(state: &AppState) -> Result<(), TrackerError> {
    // 1) Fetch every quote up front. A failed or nonsensical fetch aborts
    //    the tick with nothing written.
    let mut prices: Vec<(Token, f64)> = Vec::with_capacity(Token::ALL.len());

    for token in Token::ALL {
        let price = state.price_source.price(token.contract_address()).await?;

        if !price.is_finite() || price <= 0.0 {
            return Err(TrackerError::PriceFetch(format!(
                "{token} quote is not a positive price: {price}"
            )));
        }

        prices.push((token, price));
    }

    for (token, price) in prices {
        // 2) Read the previous sample before the new one lands.
        let change = change_detector::check(state, token, price).await?;

        // 3) Persist the new sample.
        let sample = price_store::append(state, token, price).await?;
        tracing::info!(token = %token, price = sample.price, "sample stored");

        if let Some(change) = change {
            change_detector::notify(state, &change).await;
        }

        // 4) Flip in-band rules, then notify only the rules this cycle
        //    actually flipped. A failed send after a successful flip is
        //    logged and not retried; the rule stays triggered.
        let flipped =
            alert_store::match_and_trigger(state, token, price, alert_store::ALERT_BAND).await?;

        for rule in flipped {
            let subject = format!("Price Alert: {token} hit your target");
            let body = format!(
                "{token} is trading at ${price:.2}, within 1% of your target ${:.2}.",
                rule.target_price
            );

            if let Err(e) = state.notifier.send(&rule.email, &subject, &body).await {
                tracing::error!(
                    alert_id = %rule.id,
                    email = %rule.email,
                    "alert notification failed after trigger: {e}",
                );
            }
        }
    }

    Ok(())
}
