use chrono::{DateTime, Duration, Utc};

use super::gateway::{ContentGateway, GatewayError};
use super::prompt::{cycle_prompt, SYSTEM_PROMPT};
use super::schedule::categories_for;
use super::validate::{validate_advisory, validate_article, validate_ticker};
use crate::storage::Database;

/// How long an alert or ticker stays active: one generation cycle.
const ACTIVE_WINDOW_HOURS: i64 = 4;

/// SEC-016: Ceiling on the retention window before it reaches date math;
/// `chrono::Duration::hours` panics on absurd magnitudes.
const MAX_RETENTION_HOURS: u64 = 24 * 365;

// ============================================================================
// Cycle Outcome
// ============================================================================

/// What one generation cycle stored. `skipped` counts draft items discarded
/// by validation plus rows that failed to insert; neither aborts the cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleOutcome {
    pub articles: u64,
    pub alerts: u64,
    pub tickers: u64,
    pub skipped: u64,
}

// ============================================================================
// Cycle Runner
// ============================================================================

/// Run one content generation cycle at time `now`.
///
/// Picks the slot's category pair, makes one gateway call, validates every
/// draft item independently, and writes what passed. Freshness bookkeeping
/// rides along:
/// - alerts/tickers older than [`ACTIVE_WINDOW_HOURS`] are deactivated, but
///   only when this cycle produced at least one valid replacement of that
///   kind, so a bad generation never blanks the site,
/// - articles older than `retention_hours` (capped at
///   [`MAX_RETENTION_HOURS`]) are deleted unconditionally.
///
/// Only a gateway failure (no payload at all) errors out; per-item problems
/// are logged, counted in the outcome, and skipped.
pub async fn run_cycle(
    db: &Database,
    gateway: &ContentGateway,
    retention_hours: u64,
    now: DateTime<Utc>,
) -> Result<CycleOutcome, GatewayError> {
    let (primary, secondary) = categories_for(now);
    tracing::info!(%primary, %secondary, "Starting content generation cycle");

    let draft = gateway
        .generate(SYSTEM_PROMPT, &cycle_prompt(primary, secondary))
        .await?;

    let now_ts = now.timestamp();
    let stale_cutoff = (now - Duration::hours(ACTIVE_WINDOW_HOURS)).timestamp();
    let mut outcome = CycleOutcome::default();

    // Articles: pure append, each item stands alone
    for piece in &draft.informational_pieces {
        match validate_article(piece) {
            Ok(article) => match db.insert_article(&article, now_ts).await {
                Ok(()) => outcome.articles += 1,
                Err(e) => {
                    tracing::warn!(error = %e, title = %article.title, "Failed to insert article");
                    outcome.skipped += 1;
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Discarding invalid article");
                outcome.skipped += 1;
            }
        }
    }

    // Advisory: deactivate the previous cycle's alerts only once this cycle
    // has a valid one to put in their place
    if let Some(advisory) = &draft.advisory {
        match validate_advisory(advisory) {
            Ok(alert) => {
                match db.deactivate_alerts_before(stale_cutoff).await {
                    Ok(flipped) if flipped > 0 => {
                        tracing::debug!(flipped, "Deactivated stale alerts");
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(error = %e, "Failed to deactivate stale alerts"),
                }
                match db.insert_alert(&alert, now_ts).await {
                    Ok(()) => outcome.alerts += 1,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to insert advisory");
                        outcome.skipped += 1;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discarding invalid advisory");
                outcome.skipped += 1;
            }
        }
    }

    // Tickers: same gate, applied to the batch
    let mut fresh_tickers = Vec::new();
    for ticker in &draft.tickers {
        match validate_ticker(ticker) {
            Ok(t) => fresh_tickers.push(t),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding invalid ticker");
                outcome.skipped += 1;
            }
        }
    }
    if !fresh_tickers.is_empty() {
        match db.deactivate_tickers_before(stale_cutoff).await {
            Ok(flipped) if flipped > 0 => {
                tracing::debug!(flipped, "Deactivated stale tickers");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to deactivate stale tickers"),
        }
        for ticker in &fresh_tickers {
            match db.insert_ticker(ticker, now_ts).await {
                Ok(()) => outcome.tickers += 1,
                Err(e) => {
                    tracing::warn!(error = %e, label = %ticker.label, "Failed to insert ticker");
                    outcome.skipped += 1;
                }
            }
        }
    }

    // Rolling retention runs regardless of what this cycle produced
    let retention_hours = retention_hours.min(MAX_RETENTION_HOURS) as i64;
    let retention_cutoff = (now - Duration::hours(retention_hours)).timestamp();
    match db.delete_articles_before(retention_cutoff).await {
        Ok(0) => {}
        Ok(purged) => tracing::info!(purged, "Purged articles past retention"),
        Err(e) => tracing::warn!(error = %e, "Failed to purge expired articles"),
    }

    tracing::info!(
        articles = outcome.articles,
        alerts = outcome.alerts,
        tickers = outcome.tickers,
        skipped = outcome.skipped,
        "Content generation cycle complete"
    );

    Ok(outcome)
}
