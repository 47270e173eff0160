use chrono::NaiveDateTime;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{IntradayBar, Interval};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const OPEN_KEY: &str = "1. open";
const HIGH_KEY: &str = "2. high";
const LOW_KEY: &str = "3. low";
const CLOSE_KEY: &str = "4. close";
const VOLUME_KEY: &str = "5. volume";

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("payload has no {key:?} object")]
    MissingSeries { key: String },

    #[error("unparseable timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Missing-cell counts per OHLCV column, produced by numeric coercion.
/// Diagnostic only: nothing downstream drops or imputes rows based on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullCounts {
    pub open: usize,
    pub high: usize,
    pub low: usize,
    pub close: usize,
    pub volume: usize,
}

impl NullCounts {
    pub fn total(&self) -> usize {
        self.open + self.high + self.low + self.close + self.volume
    }
}

#[derive(Debug)]
pub struct TransformOutput {
    pub bars: Vec<IntradayBar>,
    pub nulls: NullCounts,
}

/// Reshape the nested provider payload into one bar row per timestamp,
/// preserving the source key order.
///
/// Timestamps must parse (`%Y-%m-%d %H:%M:%S`); a bad timestamp is fatal.
/// Numeric coercion is total: a cell that does not parse becomes None and
/// is counted in [`NullCounts`] instead of failing the stage.
pub fn to_bars(payload: &Value, interval: Interval) -> Result<TransformOutput, TransformError> {
    let key = interval.series_key();
    let series = payload
        .get(&key)
        .and_then(Value::as_object)
        .ok_or_else(|| TransformError::MissingSeries { key: key.clone() })?;

    let mut bars = Vec::with_capacity(series.len());
    let mut nulls = NullCounts::default();

    for (raw_timestamp, fields) in series {
        let timestamp = NaiveDateTime::parse_from_str(raw_timestamp, TIMESTAMP_FORMAT).map_err(
            |source| TransformError::Timestamp {
                value: raw_timestamp.clone(),
                source,
            },
        )?;

        bars.push(IntradayBar {
            timestamp,
            open: float_field(fields, OPEN_KEY, &mut nulls.open),
            high: float_field(fields, HIGH_KEY, &mut nulls.high),
            low: float_field(fields, LOW_KEY, &mut nulls.low),
            close: float_field(fields, CLOSE_KEY, &mut nulls.close),
            volume: integer_field(fields, VOLUME_KEY, &mut nulls.volume),
        });
    }

    info!("Reshaped {} into {} bar rows", key, bars.len());
    report_nulls(&nulls);

    Ok(TransformOutput { bars, nulls })
}

fn float_field(fields: &Value, key: &str, null_count: &mut usize) -> Option<f64> {
    let parsed = fields
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| s.trim().parse::<f64>().ok());
    if parsed.is_none() {
        *null_count += 1;
    }
    parsed
}

fn integer_field(fields: &Value, key: &str, null_count: &mut usize) -> Option<i64> {
    let parsed = fields
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| s.trim().parse::<i64>().ok());
    if parsed.is_none() {
        *null_count += 1;
    }
    parsed
}

fn report_nulls(nulls: &NullCounts) {
    if nulls.total() == 0 {
        info!("No missing values after numeric coercion");
        return;
    }

    warn!(
        "Missing values per column after coercion: open={} high={} low={} close={} volume={}",
        nulls.open, nulls.high, nulls.low, nulls.close, nulls.volume
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn bar_fields(open: &str, high: &str, low: &str, close: &str, volume: &str) -> Value {
        json!({
            "1. open": open,
            "2. high": high,
            "3. low": low,
            "4. close": close,
            "5. volume": volume,
        })
    }

    #[test]
    fn produces_one_row_per_key_in_source_order() {
        // Alpha Vantage serves newest-first; the transform must not re-sort.
        let payload = json!({
            "Time Series (1min)": {
                "2024-01-02 09:32:00": bar_fields("190.30", "190.45", "190.20", "190.40", "1200"),
                "2024-01-02 09:31:00": bar_fields("190.20", "190.35", "190.10", "190.30", "900"),
                "2024-01-02 09:30:00": bar_fields("190.12", "190.25", "190.00", "190.20", "1500"),
            }
        });

        let output = to_bars(&payload, Interval::Min1).unwrap();

        assert_eq!(output.bars.len(), 3);
        let minutes: Vec<u32> = output
            .bars
            .iter()
            .map(|b| chrono::Timelike::minute(&b.timestamp))
            .collect();
        assert_eq!(minutes, vec![32, 31, 30]);
    }

    #[test]
    fn timestamp_parses_to_exact_instant() {
        let payload = json!({
            "Time Series (1min)": {
                "2024-01-02 09:30:00": bar_fields("190.12", "190.25", "190.00", "190.20", "1500"),
            }
        });

        let output = to_bars(&payload, Interval::Min1).unwrap();

        let expected = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(output.bars[0].timestamp, expected);
    }

    #[test]
    fn numeric_coercion_is_total() {
        let payload = json!({
            "Time Series (1min)": {
                "2024-01-02 09:30:00": bar_fields("190.12", "N/A", "190.00", "190.20", "1500"),
            }
        });

        let output = to_bars(&payload, Interval::Min1).unwrap();

        let bar = &output.bars[0];
        assert_eq!(bar.open, Some(190.12));
        assert_eq!(bar.high, None);
        assert_eq!(bar.low, Some(190.00));
        assert_eq!(bar.close, Some(190.20));
        assert_eq!(bar.volume, Some(1500));
    }

    #[test]
    fn null_counts_sum_matches_corrupted_cells() {
        let payload = json!({
            "Time Series (1min)": {
                "2024-01-02 09:31:00": bar_fields("190.20", "190.35", "190.10", "190.30", "n/a"),
                "2024-01-02 09:30:00": bar_fields("oops", "190.25", "190.00", "190.20", "1500"),
            }
        });

        let output = to_bars(&payload, Interval::Min1).unwrap();

        assert_eq!(output.nulls.total(), 2);
        assert_eq!(output.nulls.open, 1);
        assert_eq!(output.nulls.volume, 1);
    }

    #[test]
    fn missing_field_counts_as_null() {
        let payload = json!({
            "Time Series (1min)": {
                "2024-01-02 09:30:00": {
                    "1. open": "190.12",
                    "2. high": "190.25",
                    "3. low": "190.00",
                    "4. close": "190.20",
                }
            }
        });

        let output = to_bars(&payload, Interval::Min1).unwrap();

        assert_eq!(output.bars[0].volume, None);
        assert_eq!(output.nulls.volume, 1);
    }

    #[test]
    fn missing_series_key_is_fatal() {
        let payload = json!({ "Meta Data": {} });

        match to_bars(&payload, Interval::Min5) {
            Err(TransformError::MissingSeries { key }) => {
                assert_eq!(key, "Time Series (5min)");
            }
            other => panic!("expected MissingSeries, got {:?}", other),
        }
    }

    #[test]
    fn bad_timestamp_is_fatal() {
        let payload = json!({
            "Time Series (1min)": {
                "yesterday at nine": bar_fields("1", "1", "1", "1", "1"),
            }
        });

        assert!(matches!(
            to_bars(&payload, Interval::Min1),
            Err(TransformError::Timestamp { .. })
        ));
    }

    #[test]
    fn empty_series_yields_no_rows() {
        let payload = json!({ "Time Series (1min)": {} });

        let output = to_bars(&payload, Interval::Min1).unwrap();

        assert!(output.bars.is_empty());
        assert_eq!(output.nulls.total(), 0);
    }
}
