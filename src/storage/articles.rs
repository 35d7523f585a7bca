use anyhow::Result;

use super::schema::Database;
use super::types::{Article, NewArticle};

// ============================================================================
// Query Limit Constants
// ============================================================================

/// Maximum number of articles any single query may return (OOM protection)
const MAX_ARTICLES: i64 = 100;

impl Database {
    // ========================================================================
    // Article Operations
    // ========================================================================

    /// Insert one validated article.
    ///
    /// `published_at` is unix seconds; callers pass the cycle timestamp so
    /// every article from one generation run shares it.
    pub async fn insert_article(&self, article: &NewArticle, published_at: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO news_articles (title, excerpt, content, category, published_at)
            VALUES (?, ?, ?, ?, ?)
        "#,
        )
        .bind(&article.title)
        .bind(&article.excerpt)
        .bind(&article.content)
        .bind(article.category.as_str())
        .bind(published_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Newest articles first. Ties on published_at (articles from the same
    /// cycle) break by id descending so ordering stays deterministic.
    ///
    /// `limit` is clamped to 1..=MAX_ARTICLES regardless of what the caller
    /// asks for.
    pub async fn recent_articles(&self, limit: i64) -> Result<Vec<Article>> {
        let limit = limit.clamp(1, MAX_ARTICLES);

        let articles = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, excerpt, content, category, published_at
            FROM news_articles
            ORDER BY published_at DESC, id DESC
            LIMIT ?
        "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(articles)
    }

    /// Delete articles published strictly before `cutoff` (unix seconds).
    /// Returns the number of rows removed.
    pub async fn delete_articles_before(&self, cutoff: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM news_articles WHERE published_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Total article count, active or not. Used by tests and diagnostics.
    pub async fn count_articles(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM news_articles")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.0)
    }
}
