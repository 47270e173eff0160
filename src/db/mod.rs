use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub mod bar_queries;

/// Open (creating if missing) the single-file SQLite database at `path`.
///
/// SQLite allows one writer at a time, so the pool is capped at a single
/// connection for this one-shot job.
pub async fn connect(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
}

pub fn db_file_name(symbol: &str) -> String {
    format!("time_series_intraday_{}.db", symbol.to_lowercase())
}

pub fn table_name(symbol: &str) -> String {
    format!("time_series_intraday_{}", symbol.to_lowercase())
}

/// Table names are derived from the symbol and embedded as quoted SQL
/// identifiers, so the symbol has to be restricted to characters that can
/// never escape the quoting.
pub fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
