use thiserror::Error;

use super::draft::{DraftAdvisory, DraftArticle, DraftTicker};
use crate::storage::{Category, NewAlert, NewArticle, NewTicker, Severity};
use crate::util::sanitize_fragment;

// ============================================================================
// Field Limits
// ============================================================================
//
// All limits are in characters, counted after sanitization, so a multibyte
// title is judged by what a reader sees rather than its UTF-8 byte length.

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_EXCERPT_CHARS: usize = 500;
pub const MAX_CONTENT_CHARS: usize = 10_000;
pub const MAX_ALERT_CHARS: usize = 500;
pub const MAX_TICKER_CHARS: usize = 300;
pub const MAX_LABEL_CHARS: usize = 20;

/// Canonical ticker labels. Unrecognized labels are not rejected; they fall
/// back to an uppercased form truncated to [`MAX_LABEL_CHARS`].
pub const TICKER_LABELS: [&str; 3] = ["HARBOR", "EVENTS", "WEATHER"];

// ============================================================================
// Errors
// ============================================================================

/// Why one draft item was discarded. Scoped to a single item; the cycle
/// skips and counts the item, it never aborts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("{0} is empty after sanitization")]
    Empty(&'static str),
    #[error("{field} is {len} chars (limit {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
    #[error("unknown category: {0:?}")]
    UnknownCategory(String),
}

/// Sanitize one field and enforce its character limit.
fn bounded(field: &'static str, raw: &str, max: usize) -> Result<String, DraftError> {
    let clean = sanitize_fragment(raw);
    if clean.is_empty() {
        return Err(DraftError::Empty(field));
    }
    let len = clean.chars().count();
    if len > max {
        return Err(DraftError::TooLong { field, len, max });
    }
    Ok(clean)
}

// ============================================================================
// Item Validators
// ============================================================================
//
// Each validator is total: any draft item maps to either a fully-populated
// record with every field sanitized and bounded, or an error. There is no
// partial acceptance; one bad field discards the whole item.

/// Validate one candidate article.
pub fn validate_article(draft: &DraftArticle) -> Result<NewArticle, DraftError> {
    let title = bounded("title", &draft.title, MAX_TITLE_CHARS)?;
    let excerpt = bounded("excerpt", &draft.excerpt, MAX_EXCERPT_CHARS)?;
    let content = bounded("content", &draft.content, MAX_CONTENT_CHARS)?;
    let category = Category::parse(&draft.category)
        .ok_or_else(|| DraftError::UnknownCategory(draft.category.trim().to_string()))?;

    Ok(NewArticle {
        title,
        excerpt,
        content,
        category,
    })
}

/// Validate one candidate advisory. Severity never rejects: unknown or
/// missing values map to the safe default.
pub fn validate_advisory(draft: &DraftAdvisory) -> Result<NewAlert, DraftError> {
    let message = bounded("advisory message", &draft.message, MAX_ALERT_CHARS)?;
    let severity = Severity::parse_or_default(draft.severity.as_deref());

    Ok(NewAlert { message, severity })
}

/// Validate one candidate ticker.
///
/// A label matching the canonical set (case-insensitively) normalizes to its
/// canonical spelling; anything else becomes an uppercased fallback capped at
/// [`MAX_LABEL_CHARS`]. An empty label still rejects the item.
pub fn validate_ticker(draft: &DraftTicker) -> Result<NewTicker, DraftError> {
    let clean = sanitize_fragment(&draft.label);
    if clean.is_empty() {
        return Err(DraftError::Empty("ticker label"));
    }

    let label = match TICKER_LABELS
        .iter()
        .find(|canonical| clean.eq_ignore_ascii_case(canonical))
    {
        Some(canonical) => (*canonical).to_string(),
        None => clean.to_uppercase().chars().take(MAX_LABEL_CHARS).collect(),
    };

    let message = bounded("ticker message", &draft.message, MAX_TICKER_CHARS)?;

    Ok(NewTicker { label, message })
}
