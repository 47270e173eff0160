use async_trait::async_trait;
use thiserror::Error;

use crate::models::Interval;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected http status: {0}")]
    Http(reqwest::StatusCode),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

/// Source of raw intraday payloads. The transform stage owns the reshaping,
/// so implementations hand back the provider response as parsed JSON.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_intraday(
        &self,
        symbol: &str,
        interval: Interval,
    ) -> Result<serde_json::Value, ProviderError>;
}
