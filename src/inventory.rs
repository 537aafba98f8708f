use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category -> table-name mapping for one provider lobby.
///
/// Categories are unique; table names keep the exact string the scraper saw,
/// including duplicates and their order. An inventory with zero categories is
/// the signal of a failed or incomplete scrape, not an error value.
///
/// Serializes transparently to `{ "<category>": ["<table>", ...], ... }`,
/// the persisted JSON shape shared by baselines, actuals and report deltas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableInventory {
    categories: BTreeMap<String, Vec<String>>,
}

impl TableInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the inventory holds no categories at all.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Total number of table entries across all categories (duplicates count).
    pub fn table_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Record the table list for a category, replacing any previous list.
    pub fn insert(&mut self, category: impl Into<String>, tables: Vec<String>) {
        self.categories.insert(category.into(), tables);
    }

    pub fn tables(&self, category: &str) -> Option<&[String]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(category, tables)| (category.as_str(), tables.as_slice()))
    }
}

impl FromIterator<(String, Vec<String>)> for TableInventory {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self {
            categories: iter.into_iter().collect(),
        }
    }
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
    fn empty_inventory_signals_no_content() {
        let inv = TableInventory::new();
        assert!(inv.is_empty());
        assert_eq!(inv.category_count(), 0);
        assert_eq!(inv.table_count(), 0);
    }

    #[test]
    fn serializes_to_flat_category_map() {
        let inv = inventory(&[("Baccarat", &["T1", "T2"]), ("Roulette", &["R1"])]);
        let json = serde_json::to_string(&inv).unwrap();
        assert_eq!(json, r#"{"Baccarat":["T1","T2"],"Roulette":["R1"]}"#);

        let back: TableInventory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inv);
    }

    #[test]
    fn duplicate_table_names_are_preserved() {
        let inv = inventory(&[("Baccarat", &["Speed", "Speed", "VIP"])]);
        assert_eq!(inv.tables("Baccarat").unwrap(), &["Speed", "Speed", "VIP"]);
        assert_eq!(inv.table_count(), 3);
    }

    #[test]
    fn insert_replaces_previous_category_list() {
        let mut inv = inventory(&[("Baccarat", &["T1"])]);
        inv.insert("Baccarat", vec!["T2".to_string()]);
        assert_eq!(inv.tables("Baccarat").unwrap(), &["T2"]);
        assert_eq!(inv.category_count(), 1);
    }
}
