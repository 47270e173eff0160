use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Represents one intraday OHLCV bar for the configured symbol.
//
// The numeric columns are optional: a source cell that fails numeric
// coercion is carried as None and persisted as SQL NULL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct IntradayBar {
    pub timestamp: NaiveDateTime,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<i64>,
}
