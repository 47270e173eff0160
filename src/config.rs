use std::path::PathBuf;

use crate::db;
use crate::errors::AppError;
use crate::models::Interval;

const DEFAULT_SYMBOL: &str = "IBM";
const DEFAULT_INTERVAL: &str = "1min";

#[derive(Debug, Clone)]
pub struct Config {
    pub symbol: String,
    pub interval: Interval,
    /// Directory the symbol-derived SQLite file is created in.
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let symbol =
            std::env::var("ETL_SYMBOL").unwrap_or_else(|_| DEFAULT_SYMBOL.to_string());
        if !db::is_valid_symbol(&symbol) {
            return Err(AppError::Validation(format!(
                "ETL_SYMBOL {:?} cannot name a table (allowed: ASCII alphanumerics, '.', '_', '-')",
                symbol
            )));
        }

        let interval_raw =
            std::env::var("ETL_INTERVAL").unwrap_or_else(|_| DEFAULT_INTERVAL.to_string());
        let interval = Interval::parse(&interval_raw).ok_or_else(|| {
            AppError::Validation(format!(
                "ETL_INTERVAL {:?} is not supported (expected one of 1min, 5min, 15min, 30min, 60min)",
                interval_raw
            ))
        })?;

        let data_dir = std::env::var("ETL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        Ok(Self {
            symbol,
            interval,
            data_dir,
        })
    }
}
