use crate::error::{LobbyError, Result};
use crate::inventory::TableInventory;
use crate::reconcile::Reconciliation;
use calamine::{open_workbook, Data, Reader, Xlsx};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Read a provider's persisted inventory (`<provider>.json`).
pub fn read_inventory(dir: &Path, provider_name: &str) -> Result<TableInventory> {
    let path = dir.join(format!("{provider_name}.json"));
    if !path.exists() {
        return Err(LobbyError::BaselineNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Persist a provider's scraped inventory. Empty inventories are skipped by
/// policy: an artifact with zero categories would only mask a failed scrape.
pub fn write_inventory(
    dir: &Path,
    provider_name: &str,
    inventory: &TableInventory,
) -> Result<Option<PathBuf>> {
    if inventory.is_empty() {
        info!("Actual data for {} is empty, file write skipped", provider_name);
        return Ok(None);
    }
    let path = write_json(dir, provider_name, inventory)?;
    info!("Actual inventory saved to {}", path.display());
    Ok(Some(path))
}

/// Persist the added/removed report as `{"Added": ..., "Removed": ...}`.
pub fn write_report(
    dir: &Path,
    provider_name: &str,
    reconciliation: &Reconciliation,
) -> Result<PathBuf> {
    let path = write_json(dir, provider_name, reconciliation)?;
    info!("Report JSON saved to {}", path.display());
    Ok(path)
}

fn write_json<T: serde::Serialize>(dir: &Path, provider_name: &str, value: &T) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{provider_name}.json"));
    let content = serde_json::to_string_pretty(value)?;
    fs::write(&path, content)?;
    Ok(path)
}

/// Convert a baseline workbook into one expected-inventory JSON per sheet.
///
/// Row 1 of each sheet holds the category names; every non-empty cell below a
/// header is appended to that category's table list. Sheets without rows or
/// headers are skipped. Returns the written file paths.
pub fn baseline_from_workbook(xlsx_path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
    if !xlsx_path.exists() {
        return Err(LobbyError::Config(format!(
            "Baseline workbook does not exist: {}",
            xlsx_path.display()
        )));
    }

    let mut workbook: Xlsx<_> = open_workbook(xlsx_path)?;
    let sheet_names = workbook.sheet_names().to_owned();

    let mut written = Vec::new();
    for sheet_name in sheet_names {
        let range = match workbook.worksheet_range(&sheet_name) {
            Ok(range) => range,
            Err(e) => {
                warn!("Skipping unreadable sheet {}: {}", sheet_name, e);
                continue;
            }
        };

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            continue;
        };

        // Header cell text defines the category; blank headers drop the column.
        let headers: Vec<(usize, String)> = header_row
            .iter()
            .enumerate()
            .filter_map(|(column, cell)| {
                let text = cell_text(cell);
                (!text.is_empty()).then_some((column, text))
            })
            .collect();
        if headers.is_empty() {
            continue;
        }

        let mut inventory = TableInventory::new();
        for (column, header) in &headers {
            let tables: Vec<String> = range
                .rows()
                .skip(1)
                .filter_map(|row| row.get(*column))
                .map(cell_text)
                .filter(|text| !text.is_empty())
                .collect();
            inventory.insert(header.clone(), tables);
        }

        let file_stem = sanitize_file_stem(&sheet_name);
        let path = write_json(out_dir, &file_stem, &inventory)?;
        info!("Expected inventory saved to {}", path.display());
        written.push(path);
    }

    Ok(written)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// Sheet names may carry characters that are illegal in filenames.
fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::reconcile;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

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
    fn inventory_roundtrips_through_disk() {
        let dir = tempdir().unwrap();
        let inv = inventory(&[("Baccarat", &["T1", "T2"]), ("Roulette", &["R1"])]);

        let path = write_inventory(dir.path(), "Evolution", &inv).unwrap().unwrap();
        assert!(path.ends_with("Evolution.json"));

        let back = read_inventory(dir.path(), "Evolution").unwrap();
        assert_eq!(back, inv);
    }

    #[test]
    fn missing_baseline_is_not_found() {
        let dir = tempdir().unwrap();
        let err = read_inventory(dir.path(), "Evolution").unwrap_err();
        assert!(matches!(err, LobbyError::BaselineNotFound(_)));
    }

    #[test]
    fn empty_inventory_write_is_skipped() {
        let dir = tempdir().unwrap();
        let result = write_inventory(dir.path(), "Evolution", &TableInventory::new()).unwrap();
        assert!(result.is_none());
        assert!(!dir.path().join("Evolution.json").exists());
    }

    #[test]
    fn report_json_nests_added_and_removed() {
        let dir = tempdir().unwrap();
        let expected = inventory(&[("Baccarat", &["T1", "T2"])]);
        let actual = inventory(&[("Baccarat", &["T2", "T3"])]);

        let path = write_report(dir.path(), "Evolution", &reconcile(&expected, &actual)).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["Added"]["Baccarat"][0], "T3");
        assert_eq!(value["Removed"]["Baccarat"][0], "T1");
    }

    #[test]
    fn baseline_workbook_becomes_per_sheet_json() {
        let dir = tempdir().unwrap();
        let xlsx_path = dir.path().join("baseline.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Evolution").unwrap();
        sheet.write(0, 0, "Baccarat").unwrap();
        sheet.write(0, 1, "Roulette").unwrap();
        sheet.write(1, 0, "T1").unwrap();
        sheet.write(2, 0, "T2").unwrap();
        sheet.write(1, 1, "R1").unwrap();
        workbook.save(&xlsx_path).unwrap();

        let out_dir = dir.path().join("expected");
        let written = baseline_from_workbook(&xlsx_path, &out_dir).unwrap();
        assert_eq!(written.len(), 1);

        let evolution = read_inventory(&out_dir, "Evolution").unwrap();
        assert_eq!(evolution.tables("Baccarat").unwrap(), &["T1", "T2"]);
        assert_eq!(evolution.tables("Roulette").unwrap(), &["R1"]);
    }

    #[test]
    fn missing_workbook_is_an_error() {
        let dir = tempdir().unwrap();
        let err =
            baseline_from_workbook(&dir.path().join("nope.xlsx"), dir.path()).unwrap_err();
        assert!(matches!(err, LobbyError::Config(_)));
    }

    #[test]
    fn sheet_names_are_sanitized_for_the_filesystem() {
        assert_eq!(sanitize_file_stem("A/B:C?"), "A_B_C_");
        assert_eq!(sanitize_file_stem("Evolution"), "Evolution");
    }
}
