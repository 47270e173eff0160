use sqlx::SqlitePool;
use tracing::error;

use crate::models::IntradayBar;

/// Drop and recreate `table`, then insert every bar, all inside one
/// transaction. A failure mid-write rolls back, leaving whatever table
/// existed before the call untouched.
///
/// Replace semantics: loading the same rows twice leaves one copy.
pub async fn replace_all(
    pool: &SqlitePool,
    table: &str,
    bars: &[IntradayBar],
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await.map_err(|e| {
        error!("Failed to begin transaction for table {}: {}", table, e);
        e
    })?;

    sqlx::query(&format!(r#"DROP TABLE IF EXISTS "{}""#, table))
        .execute(&mut *tx)
        .await?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE "{}" (
            timestamp TEXT NOT NULL,
            open REAL,
            high REAL,
            low REAL,
            close REAL,
            volume INTEGER
        )
        "#,
        table
    ))
    .execute(&mut *tx)
    .await?;

    let insert = format!(
        r#"
        INSERT INTO "{}" (timestamp, open, high, low, close, volume)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        table
    );

    for (i, bar) in bars.iter().enumerate() {
        if let Err(e) = sqlx::query(&insert)
            .bind(bar.timestamp)
            .bind(bar.open)
            .bind(bar.high)
            .bind(bar.low)
            .bind(bar.close)
            .bind(bar.volume)
            .execute(&mut *tx)
            .await
        {
            error!(
                "Failed to insert bar {} into table {} (timestamp: {}): {}",
                i, table, bar.timestamp, e
            );
            return Err(e);
        }
    }

    tx.commit().await.map_err(|e| {
        error!("Failed to commit transaction for table {}: {}", table, e);
        e
    })?;

    Ok(bars.len() as u64)
}

/// Read back the first `limit` rows in insertion order. Verification only;
/// has no effect on persisted state.
pub async fn fetch_preview(
    pool: &SqlitePool,
    table: &str,
    limit: i64,
) -> Result<Vec<IntradayBar>, sqlx::Error> {
    sqlx::query_as::<_, IntradayBar>(&format!(
        r#"
        SELECT timestamp, open, high, low, close, volume
        FROM "{}"
        LIMIT ?1
        "#,
        table
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}
