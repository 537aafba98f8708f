use crate::inventory::TableInventory;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Per-category added/removed deltas between a baseline and a fresh scrape.
///
/// Serializes to the persisted report shape:
/// `{ "Added": { ... }, "Removed": { ... } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    #[serde(rename = "Added")]
    pub added: TableInventory,
    #[serde(rename = "Removed")]
    pub removed: TableInventory,
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Tables present in `actual` but missing from `expected`, per category.
///
/// Iterates the categories of `actual` only: a brand-new category reports all
/// of its tables as added, and a category present only in `expected` can never
/// contribute. Membership is tested per element against the expected set, so
/// a table listed twice in `actual` and absent from `expected` shows up twice.
pub fn compute_added(expected: &TableInventory, actual: &TableInventory) -> TableInventory {
    diff_one_side(actual, expected)
}

/// Tables present in `expected` but missing from `actual`, per category.
///
/// Mirror image of [`compute_added`]: iterates the categories of `expected`,
/// so a category that disappeared entirely reports all its tables as removed.
pub fn compute_removed(expected: &TableInventory, actual: &TableInventory) -> TableInventory {
    diff_one_side(expected, actual)
}

/// Compute both deltas. Pure: same inputs always give the same output.
pub fn reconcile(expected: &TableInventory, actual: &TableInventory) -> Reconciliation {
    Reconciliation {
        added: compute_added(expected, actual),
        removed: compute_removed(expected, actual),
    }
}

/// Tables of `source` not present in `reference`, category by category.
///
/// Only categories of `source` are visited; a category absent from
/// `reference` compares against the empty set. Categories with no surviving
/// tables are omitted from the result.
fn diff_one_side(source: &TableInventory, reference: &TableInventory) -> TableInventory {
    let mut result = TableInventory::new();
    for (category, tables) in source.iter() {
        let reference_tables: HashSet<&str> = reference
            .tables(category)
            .unwrap_or(&[])
            .iter()
            .map(String::as_str)
            .collect();
        let delta: Vec<String> = tables
            .iter()
            .filter(|table| !reference_tables.contains(table.as_str()))
            .cloned()
            .collect();
        if !delta.is_empty() {
            result.insert(category, delta);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory(entries: &[(&str, &[&str])]) -> TableInventory {
        entries
            .iter()
            .map(|(category, tables)| {
                (
                    category.to_string(),
                    tables.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn overlapping_category_reports_both_directions() {
        // Scenario A
        let expected = inventory(&[("Baccarat", &["T1", "T2"])]);
        let actual = inventory(&[("Baccarat", &["T2", "T3"])]);

        let result = reconcile(&expected, &actual);
        assert_eq!(result.added, inventory(&[("Baccarat", &["T3"])]));
        assert_eq!(result.removed, inventory(&[("Baccarat", &["T1"])]));
    }

    #[test]
    fn empty_actual_reports_everything_removed() {
        // Scenario B
        let expected = inventory(&[("Roulette", &["R1"])]);
        let actual = TableInventory::new();

        let result = reconcile(&expected, &actual);
        assert!(result.added.is_empty());
        assert_eq!(result.removed, inventory(&[("Roulette", &["R1"])]));
    }

    #[test]
    fn brand_new_category_reports_everything_added() {
        // Scenario C
        let expected = TableInventory::new();
        let actual = inventory(&[("Poker", &["P1"])]);

        let result = reconcile(&expected, &actual);
        assert_eq!(result.added, inventory(&[("Poker", &["P1"])]));
        assert!(result.removed.is_empty());
    }

    #[test]
    fn identical_inventories_produce_empty_deltas() {
        // Scenario D
        let inv = inventory(&[("Baccarat", &["T1"])]);
        let result = reconcile(&inv, &inv);
        assert!(result.is_empty());
    }

    #[test]
    fn recomputation_is_idempotent() {
        // P1
        let expected = inventory(&[("Baccarat", &["T1", "T2"]), ("Sic Bo", &["S1"])]);
        let actual = inventory(&[("Baccarat", &["T2", "T3"]), ("Dragon Tiger", &["D1"])]);

        let first = reconcile(&expected, &actual);
        let second = reconcile(&expected, &actual);
        assert_eq!(first, second);
    }

    #[test]
    fn no_inventory_adds_against_itself() {
        // P2
        let inv = inventory(&[
            ("Baccarat", &["T1", "T2"]),
            ("Roulette", &["R1"]),
            ("Empty", &[]),
        ]);
        assert!(compute_added(&inv, &inv).is_empty());
        assert!(compute_removed(&inv, &inv).is_empty());
    }

    #[test]
    fn added_and_removed_are_mirror_images() {
        // P3: added(E, A) == removed(A, E)
        let expected = inventory(&[("Baccarat", &["T1", "T2"]), ("Roulette", &["R1"])]);
        let actual = inventory(&[("Baccarat", &["T2", "T3"]), ("Poker", &["P1"])]);

        assert_eq!(
            compute_added(&expected, &actual),
            compute_removed(&actual, &expected)
        );
        assert_eq!(
            compute_removed(&expected, &actual),
            compute_added(&actual, &expected)
        );
    }

    #[test]
    fn every_differing_category_surfaces_somewhere() {
        // P4: no category silently dropped unless its table sets are identical
        let expected = inventory(&[
            ("Same", &["T1"]),
            ("Changed", &["T1", "T2"]),
            ("Gone", &["G1"]),
        ]);
        let actual = inventory(&[("Same", &["T1"]), ("Changed", &["T2", "T3"]), ("New", &["N1"])]);

        let result = reconcile(&expected, &actual);
        for category in expected.category_names().chain(actual.category_names()) {
            let identical = expected.tables(category) == actual.tables(category);
            let surfaced = result.added.contains_category(category)
                || result.removed.contains_category(category);
            assert_eq!(surfaced, !identical, "category {category}");
        }
    }

    #[test]
    fn duplicate_actual_tables_stay_duplicated_in_added() {
        let expected = inventory(&[("Baccarat", &["T1"])]);
        let actual = inventory(&[("Baccarat", &["T2", "T2", "T1"])]);

        let added = compute_added(&expected, &actual);
        assert_eq!(added.tables("Baccarat").unwrap(), &["T2", "T2"]);
    }

    #[test]
    fn duplicate_in_actual_matching_expected_is_not_added() {
        // Presence test, not multiset subtraction: two copies in actual and
        // one in expected means neither copy is "added".
        let expected = inventory(&[("Baccarat", &["T1"])]);
        let actual = inventory(&[("Baccarat", &["T1", "T1"])]);

        assert!(compute_added(&expected, &actual).is_empty());
        assert!(compute_removed(&expected, &actual).is_empty());
    }

    #[test]
    fn category_with_empty_list_differs_from_missing_category() {
        let expected = inventory(&[("Baccarat", &[])]);
        let actual = TableInventory::new();

        // Nothing to remove: the category was expected to hold no tables.
        let result = reconcile(&expected, &actual);
        assert!(result.is_empty());
    }
}
