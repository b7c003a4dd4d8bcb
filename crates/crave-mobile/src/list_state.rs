//! List presentation helpers for the craving list screen.

use crave_core::query::CravingFilter;

/// How the craving list should present an empty (or non-empty) result.
///
/// "No entries" means the store snapshot itself is empty; "no matches"
/// means records exist but the current search/filter selection kept none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEmptyState {
    NoEntries,
    NoMatches,
    Populated,
}

/// Classify the list state from the full snapshot and the visible subset.
#[must_use]
pub const fn classify_list_state(total_count: usize, visible_count: usize) -> ListEmptyState {
    if total_count == 0 {
        ListEmptyState::NoEntries
    } else if visible_count == 0 {
        ListEmptyState::NoMatches
    } else {
        ListEmptyState::Populated
    }
}

/// Placeholder card text for the two empty cases.
#[must_use]
pub const fn empty_state_message(state: ListEmptyState) -> Option<&'static str> {
    match state {
        ListEmptyState::NoEntries => Some("No cravings logged yet. Log your first craving."),
        ListEmptyState::NoMatches => Some("No cravings match the current search and filter."),
        ListEmptyState::Populated => None,
    }
}

/// Whether the user has narrowed the list away from its defaults.
#[must_use]
pub fn has_active_narrowing(search_text: &str, filter: CravingFilter) -> bool {
    !search_text.is_empty() || filter != CravingFilter::All
}

/// Header caption shown while a search or non-default filter is active.
#[must_use]
pub fn shown_caption(visible_count: usize, total_count: usize) -> String {
    format!("Showing {visible_count} of {total_count} cravings")
}
