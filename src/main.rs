mod config;
mod db;
mod errors;
mod external;
mod logging;
mod models;
mod services;
mod transform;

use crate::config::Config;
use crate::external::alphavantage::AlphaVantageProvider;
use crate::external::price_provider::PriceProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(logging::LoggingConfig::from_env())?;

    let config = Config::from_env()?;
    tracing::info!(
        "📊 Starting intraday ETL for {} at {} interval",
        config.symbol,
        config.interval.as_str()
    );

    let provider: Box<dyn PriceProvider> = Box::new(AlphaVantageProvider::from_env()?);

    let db_path = config.data_dir.join(db::db_file_name(&config.symbol));
    let pool = db::connect(&db_path).await?;

    let summary =
        services::ingest_service::run(&pool, provider.as_ref(), &config.symbol, config.interval)
            .await?;

    tracing::info!(
        "✓ Done: {} rows written to {} ({} cells failed numeric coercion)",
        summary.rows_written,
        db_path.display(),
        summary.nulls.total()
    );

    Ok(())
}
