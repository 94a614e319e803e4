//! Search and ordering rules for the record list. Kept free of UI state so the
//! same rules can be exercised directly.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{parse_date_stamp, BoatRecord};

/// Ordering applied to the visible list.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Newest `createdAt` first.
    #[default]
    Date,
    /// Owner name, A to Z.
    Owner,
    /// Boat name, A to Z.
    Boat,
}

impl SortKey {
    /// Cycle Date → Owner → Boat → Date.
    pub fn next(self) -> Self {
        match self {
            SortKey::Date => SortKey::Owner,
            SortKey::Owner => SortKey::Boat,
            SortKey::Boat => SortKey::Date,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Date => "Sort by Date",
            SortKey::Owner => "Sort by Name",
            SortKey::Boat => "Sort by Boat",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether `boat` matches `term` in owner name or boat name, ignoring case.
/// An empty term matches everything.
pub fn matches_search(boat: &BoatRecord, term: &str) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    boat.details.owner_name.to_lowercase().contains(&needle)
        || boat.details.boat_name.to_lowercase().contains(&needle)
}

/// Records matching `term`, in collection order.
pub fn filter_boats<'a>(boats: &'a [BoatRecord], term: &str) -> Vec<&'a BoatRecord> {
    boats
        .iter()
        .filter(|boat| matches_search(boat, term))
        .collect()
}

/// Stable sort in place by `key`.
pub fn sort_boats(boats: &mut [&BoatRecord], key: SortKey) {
    boats.sort_by(|a, b| compare(a, b, key));
}

/// Filter, then sort: exactly what the list view shows.
pub fn visible_boats<'a>(
    boats: &'a [BoatRecord],
    term: &str,
    key: SortKey,
) -> Vec<&'a BoatRecord> {
    let mut visible = filter_boats(boats, term);
    sort_boats(&mut visible, key);
    visible
}

/// Same rows as [`visible_boats`], as positions into `boats`.
pub fn visible_indices(boats: &[BoatRecord], term: &str, key: SortKey) -> Vec<usize> {
    let mut indices: Vec<usize> = boats
        .iter()
        .enumerate()
        .filter(|(_, boat)| matches_search(boat, term))
        .map(|(idx, _)| idx)
        .collect();
    indices.sort_by(|a, b| compare(&boats[*a], &boats[*b], key));
    indices
}

fn compare(a: &BoatRecord, b: &BoatRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => {
            let a_date = parse_date_stamp(&a.created_at);
            let b_date = parse_date_stamp(&b.created_at);
            let by_date = match (a_date, b_date) {
                (Some(a), Some(b)) => b.cmp(&a),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            by_date.then_with(|| compare_ids(b, a))
        }
        SortKey::Owner => compare_text(&a.details.owner_name, &b.details.owner_name)
            .then_with(|| compare_ids(a, b)),
        SortKey::Boat => compare_text(&a.details.boat_name, &b.details.boat_name)
            .then_with(|| compare_ids(a, b)),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Ids are millisecond stamps in practice; compare numerically when both are.
fn compare_ids(a: &BoatRecord, b: &BoatRecord) -> Ordering {
    match (a.id.parse::<u64>(), b.id.parse::<u64>()) {
        (Ok(a_num), Ok(b_num)) => a_num.cmp(&b_num),
        _ => a.id.cmp(&b.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BoatField;
    use pretty_assertions::assert_eq;

    fn boat(id: &str, owner: &str, name: &str, created: &str) -> BoatRecord {
        let mut record = BoatRecord::seed();
        record.id = id.to_string();
        record.details.set(BoatField::OwnerName, owner);
        record.details.set(BoatField::BoatName, name);
        record.created_at = created.to_string();
        record.updated_at = created.to_string();
        record
    }

    fn fleet() -> Vec<BoatRecord> {
        vec![
            boat("1", "John Oliver", "John Oliver", "8/29/2025"),
            boat("1756700000000", "Maria Santos", "Stella Maris", "9/1/2025"),
            boat("1756000000000", "pedro reyes", "Bangka", "8/24/2025"),
        ]
    }

    fn ids(boats: &[&BoatRecord]) -> Vec<String> {
        boats.iter().map(|b| b.id.clone()).collect()
    }

    #[test]
    fn search_is_case_insensitive_on_owner_or_boat() {
        let boats = fleet();
        assert_eq!(ids(&filter_boats(&boats, "john")), vec!["1"]);
        assert_eq!(ids(&filter_boats(&boats, "STELLA")), vec!["1756700000000"]);
        assert_eq!(ids(&filter_boats(&boats, "Reyes")), vec!["1756000000000"]);
        assert!(filter_boats(&boats, "zzz").is_empty());
    }

    #[test]
    fn empty_search_keeps_everything() {
        let boats = fleet();
        assert_eq!(filter_boats(&boats, "").len(), boats.len());
    }

    #[test]
    fn filtered_results_are_a_matching_subset() {
        let boats = fleet();
        for term in ["a", "an", "o", "OLI", "s", "x"] {
            let found = filter_boats(&boats, term);
            assert!(found.len() <= boats.len());
            for hit in found {
                assert!(boats.contains(hit));
                let needle = term.to_lowercase();
                assert!(
                    hit.details.owner_name.to_lowercase().contains(&needle)
                        || hit.details.boat_name.to_lowercase().contains(&needle)
                );
            }
        }
    }

    #[test]
    fn search_does_not_look_at_other_fields() {
        let boats = fleet();
        assert!(filter_boats(&boats, "Yanmar").is_empty());
    }

    #[test]
    fn date_sort_is_newest_first() {
        let boats = fleet();
        let sorted = visible_boats(&boats, "", SortKey::Date);
        assert_eq!(ids(&sorted), vec!["1756700000000", "1", "1756000000000"]);
    }

    #[test]
    fn date_ties_fall_back_to_newest_id() {
        let boats = vec![
            boat("1756000000001", "A", "A", "9/1/2025"),
            boat("1756000000002", "B", "B", "9/1/2025"),
            boat("bad", "C", "C", "not a date"),
        ];
        let sorted = visible_boats(&boats, "", SortKey::Date);
        assert_eq!(ids(&sorted), vec!["1756000000002", "1756000000001", "bad"]);
    }

    #[test]
    fn owner_and_boat_sorts_ignore_case() {
        let boats = fleet();
        assert_eq!(
            ids(&visible_boats(&boats, "", SortKey::Owner)),
            vec!["1", "1756700000000", "1756000000000"]
        );
        assert_eq!(
            ids(&visible_boats(&boats, "", SortKey::Boat)),
            vec!["1756000000000", "1", "1756700000000"]
        );
    }

    #[test]
    fn indices_follow_visible_order() {
        let boats = fleet();
        assert_eq!(visible_indices(&boats, "", SortKey::Date), vec![1, 0, 2]);
        assert_eq!(visible_indices(&boats, "an", SortKey::Boat), vec![2, 1]);
    }

    #[test]
    fn sort_key_cycles() {
        assert_eq!(SortKey::default(), SortKey::Date);
        assert_eq!(SortKey::Date.next().next().next(), SortKey::Date);
        assert_eq!(SortKey::Owner.to_string(), "Sort by Name");
    }
}
