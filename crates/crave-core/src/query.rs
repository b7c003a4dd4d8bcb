//! Craving list query engine
//!
//! Given a full snapshot of craving records plus the screen's transient
//! search text and filter selection, produce the ordered subset to display.
//! Stateless and recomputed on every state change; the snapshot itself is
//! owned by the store, never mutated here.

use crate::models::Craving;

/// Inclusive intensity floor for the high-intensity filter (1-10 scale).
pub const HIGH_INTENSITY_THRESHOLD: f64 = 7.0;

/// Inclusive resistance floor for the high-resistance filter (1-10 scale).
pub const HIGH_RESISTANCE_THRESHOLD: f64 = 7.0;

/// Rolling window for the recent filter: 7 x 24h, not calendar-aligned.
pub const RECENT_WINDOW_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Display-narrowing mode applied on top of free-text search.
///
/// Exactly one category is active at a time; search text is an independent
/// predicate applied before the category stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CravingFilter {
    /// Show everything the search stage kept
    #[default]
    All,
    /// Cravings logged within the last 7 days
    Recent,
    /// Cravings with intensity at or above the threshold
    HighIntensity,
    /// Cravings with resistance at or above the threshold, strongest first
    HighResistance,
}

impl CravingFilter {
    /// Every variant, in chip display order.
    pub const ALL: [Self; 4] = [
        Self::All,
        Self::Recent,
        Self::HighIntensity,
        Self::HighResistance,
    ];

    /// Chip label shown in the list screen.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Recent => "Recent",
            Self::HighIntensity => "High intensity",
            Self::HighResistance => "High resistance",
        }
    }
}

/// Select the ordered subset of `records` to display.
///
/// Two stages, in strict order:
///
/// 1. Text stage: an empty `search_text` passes every record through;
///    otherwise only records whose description contains `search_text` as a
///    case-insensitive substring survive. No trimming is performed on
///    either operand, so leading/trailing whitespace is significant.
/// 2. Category stage, applied to the survivors. `All`, `Recent`, and
///    `HighIntensity` preserve snapshot order; `HighResistance` re-sorts
///    descending by resistance with a stable sort (ties keep input order).
///
/// `now_ms` anchors the rolling recent window; callers that want the wall
/// clock use [`select_cravings_now`]. Never fails: no matches yields an
/// empty vec.
#[must_use]
pub fn select_cravings(
    records: &[Craving],
    search_text: &str,
    filter: CravingFilter,
    now_ms: i64,
) -> Vec<Craving> {
    let mut selected: Vec<Craving> = if search_text.is_empty() {
        records.to_vec()
    } else {
        let needle = search_text.to_lowercase();
        records
            .iter()
            .filter(|craving| craving.description.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    };

    match filter {
        CravingFilter::All => {}
        CravingFilter::Recent => {
            let cutoff = now_ms - RECENT_WINDOW_MS;
            selected.retain(|craving| craving.logged_at >= cutoff);
        }
        CravingFilter::HighIntensity => {
            selected.retain(|craving| craving.intensity >= HIGH_INTENSITY_THRESHOLD);
        }
        CravingFilter::HighResistance => {
            selected.retain(|craving| craving.resistance >= HIGH_RESISTANCE_THRESHOLD);
            // Vec::sort_by is stable, so ties keep their snapshot order
            selected.sort_by(|a, b| b.resistance.total_cmp(&a.resistance));
        }
    }

    selected
}

/// [`select_cravings`] anchored at the current wall clock.
#[must_use]
pub fn select_cravings_now(
    records: &[Craving],
    search_text: &str,
    filter: CravingFilter,
) -> Vec<Craving> {
    select_cravings(
        records,
        search_text,
        filter,
        chrono::Utc::now().timestamp_millis(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NOW_MS: i64 = 1_700_000_000_000;
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    fn craving(description: &str, intensity: f64, resistance: f64, logged_at: i64) -> Craving {
        let mut craving = Craving::new(description, intensity, resistance, Vec::new());
        craving.logged_at = logged_at;
        craving
    }

    fn descriptions(cravings: &[Craving]) -> Vec<&str> {
        cravings
            .iter()
            .map(|craving| craving.description.as_str())
            .collect()
    }

    #[test]
    fn all_with_empty_search_is_identity() {
        let records = vec![
            craving("Coffee", 3.0, 2.0, NOW_MS - DAY_MS),
            craving("Sugar", 9.0, 8.0, NOW_MS - 2 * DAY_MS),
            craving("Salt", 5.0, 5.0, NOW_MS - 3 * DAY_MS),
        ];

        let selected = select_cravings(&records, "", CravingFilter::All, NOW_MS);
        assert_eq!(selected, records);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let records = vec![craving("Late Night Snack", 5.0, 5.0, NOW_MS)];

        for needle in ["night", "NIGHT", "Night Sn"] {
            let selected = select_cravings(&records, needle, CravingFilter::All, NOW_MS);
            assert_eq!(selected.len(), 1, "expected a match for {needle:?}");
        }

        let selected = select_cravings(&records, "nights", CravingFilter::All, NOW_MS);
        assert!(selected.is_empty());
    }

    #[test]
    fn search_does_not_trim_whitespace() {
        let records = vec![craving("Late Night Snack", 5.0, 5.0, NOW_MS)];

        // " night " only matches because the description contains the
        // surrounding spaces; " snack " does not (trailing edge of text)
        let selected = select_cravings(&records, " night ", CravingFilter::All, NOW_MS);
        assert_eq!(selected.len(), 1);

        let selected = select_cravings(&records, " snack ", CravingFilter::All, NOW_MS);
        assert!(selected.is_empty());
    }

    #[test]
    fn high_intensity_threshold_is_inclusive() {
        let records = vec![
            craving("at threshold", 7.0, 1.0, NOW_MS),
            craving("just below", 6.999, 1.0, NOW_MS),
            craving("above", 9.5, 1.0, NOW_MS),
        ];

        let selected = select_cravings(&records, "", CravingFilter::HighIntensity, NOW_MS);
        assert_eq!(descriptions(&selected), vec!["at threshold", "above"]);
    }

    #[test]
    fn high_intensity_preserves_snapshot_order() {
        let records = vec![
            craving("third", 7.0, 1.0, NOW_MS),
            craving("skip", 2.0, 1.0, NOW_MS),
            craving("first", 10.0, 1.0, NOW_MS),
        ];

        let selected = select_cravings(&records, "", CravingFilter::HighIntensity, NOW_MS);
        // No re-sort: intensity 7 stays ahead of intensity 10
        assert_eq!(descriptions(&selected), vec!["third", "first"]);
    }

    #[test]
    fn recent_window_boundary_is_inclusive_to_the_second() {
        let records = vec![
            craving("exactly 7d", 5.0, 5.0, NOW_MS - 7 * DAY_MS),
            craving("7d 1s", 5.0, 5.0, NOW_MS - 7 * DAY_MS - 1000),
            craving("yesterday", 5.0, 5.0, NOW_MS - DAY_MS),
        ];

        let selected = select_cravings(&records, "", CravingFilter::Recent, NOW_MS);
        assert_eq!(descriptions(&selected), vec!["exactly 7d", "yesterday"]);
    }

    #[test]
    fn high_resistance_sorts_descending_with_stable_ties() {
        let records = vec![
            craving("seven a", 1.0, 7.0, NOW_MS),
            craving("nine", 1.0, 9.0, NOW_MS),
            craving("seven b", 1.0, 7.0, NOW_MS),
            craving("eight", 1.0, 8.0, NOW_MS),
        ];

        let selected = select_cravings(&records, "", CravingFilter::HighResistance, NOW_MS);
        assert_eq!(
            descriptions(&selected),
            vec!["nine", "eight", "seven a", "seven b"]
        );
    }

    #[test]
    fn high_resistance_excludes_below_threshold() {
        let records = vec![
            craving("keep", 1.0, 7.0, NOW_MS),
            craving("drop", 1.0, 6.999, NOW_MS),
        ];

        let selected = select_cravings(&records, "", CravingFilter::HighResistance, NOW_MS);
        assert_eq!(descriptions(&selected), vec!["keep"]);
    }

    #[test]
    fn search_narrows_before_category_filter() {
        let records = vec![
            craving("Midnight snack run", 9.0, 1.0, NOW_MS),
            craving("Espresso urge", 8.0, 1.0, NOW_MS),
        ];

        // High-intensity record without "snack" must not survive
        let selected = select_cravings(&records, "snack", CravingFilter::HighIntensity, NOW_MS);
        assert_eq!(descriptions(&selected), vec!["Midnight snack run"]);
    }

    #[test]
    fn no_matches_yields_empty_not_error() {
        let records = vec![craving("Coffee", 5.0, 5.0, NOW_MS)];

        assert!(select_cravings(&[], "", CravingFilter::All, NOW_MS).is_empty());
        assert!(select_cravings(&records, "nomatch", CravingFilter::All, NOW_MS).is_empty());
    }

    #[test]
    fn end_to_end_scenario() {
        let records = vec![
            craving("Coffee craving", 8.0, 3.0, NOW_MS - DAY_MS),
            craving("Sugar craving", 5.0, 9.0, NOW_MS - 10 * DAY_MS),
        ];

        let selected = select_cravings(&records, "", CravingFilter::HighResistance, NOW_MS);
        assert_eq!(descriptions(&selected), vec!["Sugar craving"]);
        assert_eq!(selected[0].resistance, 9.0);
    }

    #[test]
    fn filter_labels_and_default() {
        assert_eq!(CravingFilter::default(), CravingFilter::All);
        assert_eq!(CravingFilter::ALL.len(), 4);
        assert_eq!(CravingFilter::Recent.label(), "Recent");
        assert_eq!(CravingFilter::HighResistance.label(), "High resistance");
    }
}
