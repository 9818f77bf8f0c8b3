use chrono::Utc;
use serde_json::json;

use crate::error::TrackerError;
use crate::models::Token;
use crate::AppState;

const WBTC_ADDRESS: &str = "0x2260fac5e5542a773aa44fbcfedf7c193bc2c599";
const FEE_RATE: f64 = 0.0003;

/// Quote an ETH -> BTC conversion at spot. Pure computation over two live
/// quotes; nothing here touches the alert pipeline or the store.
pub async fn swap_rate(state: &AppState, amount_eth: f64) -> Result<serde_json::Value, TrackerError> {
    let eth_price = state
        .price_source
        .price(Token::Eth.contract_address())
        .await?;
    let btc_price = state.price_source.price(WBTC_ADDRESS).await?;

    let total_usd = amount_eth * eth_price;
    let amount_btc = total_usd / btc_price;
    let fee_eth = amount_eth * FEE_RATE;
    let fee_usd = total_usd * FEE_RATE;

    Ok(json!({
        "input": { "amount": amount_eth, "currency": "ETH" },
        "output": { "amount": format!("{amount_btc:.8}"), "currency": "BTC" },
        "exchangeRates": {
            "ETH_USD": format!("{eth_price:.2}"),
            "BTC_USD": format!("{btc_price:.2}"),
        },
        "fees": {
            "percentage": "0.03%",
            "eth": format!("{fee_eth:.6}"),
            "usd": format!("{fee_usd:.2}"),
        },
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
