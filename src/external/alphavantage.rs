use crate::external::price_provider::{PriceProvider, ProviderError};
use crate::models::Interval;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const FUNCTION: &str = "TIME_SERIES_INTRADAY";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(8);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct AlphaVantageProvider {
    client: reqwest::Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = std::env::var("ALPHAVANTAGE_API_KEY")
            .map_err(|_| ProviderError::BadResponse("ALPHAVANTAGE_API_KEY not set".into()))?;

        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self { client, api_key })
    }
}

// Alpha Vantage reports its own failures inside a 200 body:
// { "Note": "Thank you for using Alpha Vantage! ... 5 calls per minute ..." }
// { "Information": "..." } (newer throttle variant)
// { "Error Message": "Invalid API call. ..." }
pub(crate) fn check_error_envelope(payload: &Value) -> Result<(), ProviderError> {
    if payload.get("Note").is_some() || payload.get("Information").is_some() {
        return Err(ProviderError::RateLimited);
    }

    if let Some(msg) = payload.get("Error Message").and_then(Value::as_str) {
        return Err(ProviderError::BadResponse(msg.to_string()));
    }

    Ok(())
}

#[async_trait]
impl PriceProvider for AlphaVantageProvider {
    async fn fetch_intraday(
        &self,
        symbol: &str,
        interval: Interval,
    ) -> Result<Value, ProviderError> {
        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", FUNCTION),
                ("symbol", symbol),
                ("interval", interval.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = resp.status();
        debug!("Alpha Vantage answered {} for symbol {}", status, symbol);
        if !status.is_success() {
            return Err(ProviderError::Http(status));
        }

        let payload = resp
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        if let Some(obj) = payload.as_object() {
            debug!(
                "Top-level payload keys: {:?}",
                obj.keys().collect::<Vec<_>>()
            );
        }

        check_error_envelope(&payload)?;

        Ok(payload)
    }
}
