use anyhow::Result;

use super::schema::Database;
use super::types::{Alert, NewAlert};

impl Database {
    // ========================================================================
    // Alert Operations
    // ========================================================================

    /// Insert one validated advisory as active.
    pub async fn insert_alert(&self, alert: &NewAlert, created_at: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO alerts (message, severity, active, created_at)
            VALUES (?, ?, 1, ?)
        "#,
        )
        .bind(&alert.message)
        .bind(alert.severity.as_str())
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Active advisories, newest first.
    pub async fn active_alerts(&self) -> Result<Vec<Alert>> {
        let alerts = sqlx::query_as::<_, Alert>(
            r#"
            SELECT id, message, severity, active, created_at
            FROM alerts
            WHERE active = 1
            ORDER BY created_at DESC, id DESC
        "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }

    /// Deactivate active alerts created strictly before `cutoff` (unix
    /// seconds). Rows are kept, not deleted. Returns how many were flipped.
    pub async fn deactivate_alerts_before(&self, cutoff: i64) -> Result<u64> {
        let result = sqlx::query("UPDATE alerts SET active = 0 WHERE active = 1 AND created_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Total alert count including deactivated rows. Used by tests and
    /// diagnostics to distinguish deactivation from deletion.
    pub async fn count_alerts(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM alerts")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.0)
    }
}
