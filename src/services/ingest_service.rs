use sqlx::SqlitePool;
use tracing::{error, info};

use crate::db::{self, bar_queries};
use crate::errors::AppError;
use crate::external::price_provider::PriceProvider;
use crate::models::Interval;
use crate::transform::{self, NullCounts};

const PREVIEW_ROWS: i64 = 5;

#[derive(Debug)]
pub struct IngestSummary {
    pub rows_written: u64,
    pub nulls: NullCounts,
}

/// Run the full extract → transform → load sequence for one symbol.
///
/// Each stage must succeed before the next one starts; in particular a
/// failed fetch aborts the run before the loader touches the database.
pub async fn run(
    pool: &SqlitePool,
    provider: &dyn PriceProvider,
    symbol: &str,
    interval: Interval,
) -> Result<IngestSummary, AppError> {
    if !db::is_valid_symbol(symbol) {
        return Err(AppError::Validation(format!(
            "symbol {:?} cannot name a table",
            symbol
        )));
    }

    info!("Fetching {} intraday series for {}", interval, symbol);
    let payload = provider.fetch_intraday(symbol, interval).await.map_err(|e| {
        error!("Extract stage failed for {}: {}", symbol, e);
        AppError::from(e)
    })?;

    let output = transform::to_bars(&payload, interval)?;

    let table = db::table_name(symbol);
    let rows_written = bar_queries::replace_all(pool, &table, &output.bars)
        .await
        .map_err(|e| {
            error!("Load stage failed for table {}: {}", table, e);
            AppError::Db(e)
        })?;

    let preview = bar_queries::fetch_preview(pool, &table, PREVIEW_ROWS).await?;
    for bar in &preview {
        info!(
            "✓ {} | open={:?} high={:?} low={:?} close={:?} volume={:?}",
            bar.timestamp, bar.open, bar.high, bar.low, bar.close, bar.volume
        );
    }
    info!("Loaded {} rows into {}", rows_written, table);

    Ok(IngestSummary {
        rows_written,
        nulls: output.nulls,
    })
}
