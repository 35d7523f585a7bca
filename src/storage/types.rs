use std::fmt;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Database-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum StorageError {
    /// Another instance of the application has locked the database
    #[error("Another instance of tidewire appears to be running. Please close it and try again.")]
    InstanceLocked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl StorageError {
    /// Check if a sqlx error indicates database locking
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        let error_string = err.to_string().to_lowercase();

        // Check for SQLite lock-related error messages
        // SQLITE_BUSY (5): database is locked
        // SQLITE_LOCKED (6): database table is locked
        // SQLITE_CANTOPEN (14): unable to open database file
        if error_string.contains("database is locked")
            || error_string.contains("database table is locked")
            || error_string.contains("sqlite_busy")
            || error_string.contains("sqlite_locked")
            || error_string.contains("unable to open database file")
        {
            return StorageError::InstanceLocked;
        }

        StorageError::Other(err)
    }
}

// ============================================================================
// Domain Enums
// ============================================================================

/// The fixed set of article categories the newsroom writes for.
///
/// Declaration order doubles as the rotation order for the six daily
/// generation slots, so reordering variants changes which categories are
/// paired together in a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Wildlife,
    Transportation,
    Culture,
    Fishing,
    Weather,
    Local,
    Community,
    Maritime,
    Recreation,
}

impl Category {
    /// All categories, in rotation order.
    pub const ALL: [Category; 9] = [
        Category::Wildlife,
        Category::Transportation,
        Category::Culture,
        Category::Fishing,
        Category::Weather,
        Category::Local,
        Category::Community,
        Category::Maritime,
        Category::Recreation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Wildlife => "Wildlife",
            Category::Transportation => "Transportation",
            Category::Culture => "Culture",
            Category::Fishing => "Fishing",
            Category::Weather => "Weather",
            Category::Local => "Local",
            Category::Community => "Community",
            Category::Maritime => "Maritime",
            Category::Recreation => "Recreation",
        }
    }

    /// Case-insensitive exact match against the allowed set, after trimming.
    ///
    /// "fishing" and " Fishing " both resolve; "Fish" and "Sports" do not.
    /// Anything unrecognized is `None` — there is no fallback category.
    pub fn parse(raw: &str) -> Option<Category> {
        let trimmed = raw.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|category| trimmed.eq_ignore_ascii_case(category.as_str()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert severity levels, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }

    /// Map an untrusted severity string onto the allowed set.
    ///
    /// Missing or unrecognized values fall back to [`Severity::Info`] rather
    /// than rejecting the advisory — a mislabeled warning is still worth
    /// showing, just not at an escalated level it never earned.
    pub fn parse_or_default(raw: Option<&str>) -> Severity {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("critical") => Severity::Critical,
            Some(s) if s.eq_ignore_ascii_case("warning") => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Validated Input Records
// ============================================================================

/// A generated article that has passed validation and is ready to insert.
///
/// Every string field has been sanitized and length-checked; the category is
/// guaranteed to be in the allowed set. Construct these through the
/// newsroom validators, not by hand.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: Category,
}

/// A validated safety advisory ready to insert.
#[derive(Debug, Clone)]
pub struct NewAlert {
    pub message: String,
    pub severity: Severity,
}

/// A validated ticker message ready to insert.
///
/// `label` is either one of the canonical ticker labels or the sanitized
/// uppercase fallback the validator produced for an unrecognized one.
#[derive(Debug, Clone)]
pub struct NewTicker {
    pub label: String,
    pub message: String,
}

// ============================================================================
// Row Types
// ============================================================================

/// Article row as stored. Immutable once written; rows leave the table only
/// through the rolling retention delete.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    /// Unix seconds.
    pub published_at: i64,
}

/// Alert row as stored. Stale rows are deactivated, never deleted.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Alert {
    pub id: i64,
    pub message: String,
    pub severity: String,
    pub active: bool,
    /// Unix seconds.
    pub created_at: i64,
}

/// Ticker row as stored. Same deactivation policy as [`Alert`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TickerMessage {
    pub id: i64,
    pub label: String,
    pub message: String,
    pub active: bool,
    /// Unix seconds.
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_exact() {
        assert_eq!(Category::parse("Wildlife"), Some(Category::Wildlife));
        assert_eq!(Category::parse("Maritime"), Some(Category::Maritime));
    }

    #[test]
    fn test_category_parse_case_insensitive() {
        assert_eq!(Category::parse("fishing"), Some(Category::Fishing));
        assert_eq!(Category::parse("WEATHER"), Some(Category::Weather));
        assert_eq!(Category::parse("tRaNsPoRtAtIoN"), Some(Category::Transportation));
    }

    #[test]
    fn test_category_parse_trims() {
        assert_eq!(Category::parse("  Culture  "), Some(Category::Culture));
        assert_eq!(Category::parse("\tLocal\n"), Some(Category::Local));
    }

    #[test]
    fn test_category_parse_rejects_unknown() {
        assert_eq!(Category::parse("Sports"), None);
        assert_eq!(Category::parse("Fish"), None);
        assert_eq!(Category::parse("Wild life"), None);
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn test_category_parse_rejects_partial_match() {
        // Substrings and supersets of allowed names are not matches
        assert_eq!(Category::parse("Recreational"), None);
        assert_eq!(Category::parse("Communit"), None);
    }

    #[test]
    fn test_category_all_round_trips() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_severity_parse_known_values() {
        assert_eq!(Severity::parse_or_default(Some("critical")), Severity::Critical);
        assert_eq!(Severity::parse_or_default(Some("WARNING")), Severity::Warning);
        assert_eq!(Severity::parse_or_default(Some("info")), Severity::Info);
    }

    #[test]
    fn test_severity_defaults_to_info() {
        assert_eq!(Severity::parse_or_default(None), Severity::Info);
        assert_eq!(Severity::parse_or_default(Some("urgent")), Severity::Info);
        assert_eq!(Severity::parse_or_default(Some("")), Severity::Info);
    }

    #[test]
    fn test_severity_parse_trims() {
        assert_eq!(Severity::parse_or_default(Some(" critical ")), Severity::Critical);
    }
}
