use crate::error::Result;
use crate::inventory::TableInventory;
use crate::reconcile::Reconciliation;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const REPORT_COLUMNS: [&str; 4] = [
    "Category",
    "Expected Tables",
    "Added Tables",
    "Removed Tables",
];

const COLUMN_WIDTH: f64 = 30.0;
const SEPARATOR_ROW_HEIGHT: f64 = 3.0;

/// One spreadsheet line: table names vertically aligned per column. The
/// alignment is purely presentational; the three cells of a row have no
/// positional relationship to each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub expected: String,
    pub added: String,
    pub removed: String,
}

/// All rows of one category, label emitted once on the first row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBlock {
    pub category: String,
    pub rows: Vec<ReportRow>,
}

/// Build the row blocks for a provider sheet: the union of category keys from
/// expected and actual, each padded with empty strings to the longest of its
/// three lists. Deterministic order within a run.
pub fn assemble_blocks(
    expected: &TableInventory,
    actual: &TableInventory,
    reconciliation: &Reconciliation,
) -> Vec<CategoryBlock> {
    let categories: BTreeSet<&str> = expected
        .category_names()
        .chain(actual.category_names())
        .collect();

    categories
        .into_iter()
        .map(|category| {
            let expected_tables = expected.tables(category).unwrap_or(&[]);
            let added_tables = reconciliation.added.tables(category).unwrap_or(&[]);
            let removed_tables = reconciliation.removed.tables(category).unwrap_or(&[]);

            let height = expected_tables
                .len()
                .max(added_tables.len())
                .max(removed_tables.len());

            let rows = (0..height)
                .map(|i| ReportRow {
                    expected: expected_tables.get(i).cloned().unwrap_or_default(),
                    added: added_tables.get(i).cloned().unwrap_or_default(),
                    removed: removed_tables.get(i).cloned().unwrap_or_default(),
                })
                .collect();

            CategoryBlock {
                category: category.to_string(),
                rows,
            }
        })
        .collect()
}

/// Write a provider's comparison workbook: one sheet, styled header, bordered
/// data rows, thin blank separator rows between category blocks. Empty inputs
/// still produce a header-only artifact.
pub fn write_excel_report(
    dir: &Path,
    provider_name: &str,
    expected: &TableInventory,
    actual: &TableInventory,
    reconciliation: &Reconciliation,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{provider_name}.xlsx"));

    let header_format = Format::new()
        .set_bold()
        .set_font_size(14)
        .set_background_color(Color::Black)
        .set_font_color(Color::White)
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);
    let cell_format = Format::new().set_border(FormatBorder::Thin);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sanitize_sheet_name(provider_name))?;

    for (column, title) in REPORT_COLUMNS.iter().enumerate() {
        worksheet.set_column_width(column as u16, COLUMN_WIDTH)?;
        worksheet.write_with_format(0, column as u16, *title, &header_format)?;
    }

    let mut row_index: u32 = 1;
    for block in assemble_blocks(expected, actual, reconciliation) {
        for (i, row) in block.rows.iter().enumerate() {
            let label = if i == 0 { block.category.as_str() } else { "" };
            worksheet.write_with_format(row_index, 0, label, &cell_format)?;
            worksheet.write_with_format(row_index, 1, row.expected.as_str(), &cell_format)?;
            worksheet.write_with_format(row_index, 2, row.added.as_str(), &cell_format)?;
            worksheet.write_with_format(row_index, 3, row.removed.as_str(), &cell_format)?;
            row_index += 1;
        }
        // Blank separator between category blocks, squeezed nearly flat.
        worksheet.set_row_height(row_index, SEPARATOR_ROW_HEIGHT)?;
        row_index += 1;
    }

    workbook.save(&path)?;
    info!("Excel report saved to {}", path.display());
    Ok(path)
}

/// Excel sheet names top out at 31 characters and reject [ ] * / \ ? :
fn sanitize_sheet_name(provider_name: &str) -> String {
    provider_name
        .chars()
        .take(31)
        .map(|c| match c {
            '[' | ']' | '*' | '/' | '\\' | '?' | ':' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::reconcile;
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
    fn blocks_pad_to_longest_column() {
        let expected = inventory(&[("Baccarat", &["T1", "T2", "T3"])]);
        let actual = inventory(&[("Baccarat", &["T3", "T4"])]);
        let reconciliation = reconcile(&expected, &actual);

        let blocks = assemble_blocks(&expected, &actual, &reconciliation);
        assert_eq!(blocks.len(), 1);

        let block = &blocks[0];
        assert_eq!(block.category, "Baccarat");
        // Expected list is longest at 3; added (T4) and removed (T1, T2) pad up.
        assert_eq!(block.rows.len(), 3);
        assert_eq!(block.rows[0].expected, "T1");
        assert_eq!(block.rows[0].added, "T4");
        assert_eq!(block.rows[0].removed, "T1");
        assert_eq!(block.rows[1].added, "");
        assert_eq!(block.rows[1].removed, "T2");
        assert_eq!(block.rows[2].expected, "T3");
        assert_eq!(block.rows[2].added, "");
        assert_eq!(block.rows[2].removed, "");
    }

    #[test]
    fn union_of_keys_covers_both_sides() {
        let expected = inventory(&[("Gone", &["G1"])]);
        let actual = inventory(&[("New", &["N1"])]);
        let reconciliation = reconcile(&expected, &actual);

        let blocks = assemble_blocks(&expected, &actual, &reconciliation);
        let names: Vec<&str> = blocks.iter().map(|b| b.category.as_str()).collect();
        assert_eq!(names, vec!["Gone", "New"]);
    }

    #[test]
    fn empty_inputs_produce_no_blocks_but_still_an_artifact() {
        let empty = TableInventory::new();
        let reconciliation = reconcile(&empty, &empty);
        assert!(assemble_blocks(&empty, &empty, &reconciliation).is_empty());

        let dir = tempdir().unwrap();
        let path =
            write_excel_report(dir.path(), "Evolution", &empty, &empty, &reconciliation).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn workbook_is_written_for_real_data() {
        let expected = inventory(&[("Baccarat", &["T1", "T2"]), ("Roulette", &["R1"])]);
        let actual = inventory(&[("Baccarat", &["T2", "T3"])]);
        let reconciliation = reconcile(&expected, &actual);

        let dir = tempdir().unwrap();
        let path =
            write_excel_report(dir.path(), "Evolution", &expected, &actual, &reconciliation)
                .unwrap();
        assert!(path.ends_with("Evolution.xlsx"));
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn sheet_names_are_sanitized_and_truncated() {
        assert_eq!(sanitize_sheet_name("A/B:C"), "A_B_C");
        let long = "x".repeat(40);
        assert_eq!(sanitize_sheet_name(&long).len(), 31);
    }
}
