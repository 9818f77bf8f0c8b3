use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::TrackerError;

const BASE_URL: &str = "https://deep-index.moralis.io/api/v2.2";
const CHAIN: &str = "0x1";

/// Anything that can quote a contract in USD. The tracker only sees this
/// trait, so tests can swap in a canned source.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn price(&self, contract_address: &str) -> Result<f64, TrackerError>;
}

#[derive(Clone)]
pub struct MoralisClient {
    http: Client,
    api_key: String,
}

impl MoralisClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, TrackerError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TrackerError::Config(format!("http client: {e}")))?;

        Ok(Self { http, api_key })
    }

    fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[async_trait]
impl PriceSource for MoralisClient {
    async fn price(&self, contract_address: &str) -> Result<f64, TrackerError> {
        if !self.has_key() {
            return Err(TrackerError::Config(
                "MORALIS_API_KEY is missing in .env".to_string(),
            ));
        }

        let url = format!("{BASE_URL}/erc20/{contract_address}/price");
        let res = self
            .http
            .get(url)
            .query(&[("chain", CHAIN)])
            .header("X-API-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| TrackerError::PriceFetch(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(TrackerError::PriceFetch(format!(
                "Moralis quote failed: {status} {body}"
            )));
        }

        let quote = res
            .json::<TokenPriceResponse>()
            .await
            .map_err(|e| TrackerError::PriceFetch(e.to_string()))?;

        Ok(quote.usd_price)
    }
}

#[derive(Debug, Deserialize)]
struct TokenPriceResponse {
    #[serde(rename = "usdPrice")]
    usd_price: f64,
}
