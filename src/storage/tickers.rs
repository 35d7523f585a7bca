use anyhow::Result;

use super::schema::Database;
use super::types::{NewTicker, TickerMessage};

impl Database {
    // ========================================================================
    // Ticker Operations
    // ========================================================================

    /// Insert one validated ticker message as active.
    pub async fn insert_ticker(&self, ticker: &NewTicker, created_at: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO ticker_messages (label, message, active, created_at)
            VALUES (?, ?, 1, ?)
        "#,
        )
        .bind(&ticker.label)
        .bind(&ticker.message)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Active ticker messages in insertion order, oldest first, so a crawl
    /// display plays a batch in the order it was generated.
    pub async fn active_tickers(&self) -> Result<Vec<TickerMessage>> {
        let tickers = sqlx::query_as::<_, TickerMessage>(
            r#"
            SELECT id, label, message, active, created_at
            FROM ticker_messages
            WHERE active = 1
            ORDER BY id ASC
        "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tickers)
    }

    /// Deactivate active tickers created strictly before `cutoff` (unix
    /// seconds). Rows are kept, not deleted. Returns how many were flipped.
    pub async fn deactivate_tickers_before(&self, cutoff: i64) -> Result<u64> {
        let result =
            sqlx::query("UPDATE ticker_messages SET active = 0 WHERE active = 1 AND created_at < ?")
                .bind(cutoff)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }

    /// Total ticker count including deactivated rows.
    pub async fn count_tickers(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ticker_messages")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.0)
    }
}
