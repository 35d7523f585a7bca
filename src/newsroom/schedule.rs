use chrono::{DateTime, Timelike, Utc};

use crate::storage::Category;

// ============================================================================
// Cycle Schedule
// ============================================================================

/// Offset between the primary and secondary category index. Three steps
/// through a nine-entry rotation means a category returns as secondary half a
/// day after it ran as primary, so no slot pairs a category with itself.
const SECONDARY_OFFSET: usize = 3;

/// Four-hour slot index for an hour of the day: 0..=5.
pub fn slot(hour: u32) -> usize {
    (hour / 4) as usize
}

/// The two categories this cycle should write about, derived purely from the
/// clock. Six slots rotating through nine categories means consecutive days
/// start the rotation at different points, covering the whole set over time.
pub fn categories_for(now: DateTime<Utc>) -> (Category, Category) {
    let slot = slot(now.hour());
    let n = Category::ALL.len();
    let primary = Category::ALL[slot % n];
    let secondary = Category::ALL[(slot + SECONDARY_OFFSET) % n];
    (primary, secondary)
}
