use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;

use crate::error::Result;
use crate::models::BoatRecord;

use super::write_export;

/// Fixed output name; each export replaces the previous one.
pub const SPREADSHEET_FILE_NAME: &str = "boat_records.xlsx";
/// Name of the only worksheet in the workbook.
pub const SHEET_NAME: &str = "Boats";

/// Header row followed by one row per record, all as text.
pub fn sheet_rows(boats: &[BoatRecord]) -> Vec<Vec<&str>> {
    let mut rows = Vec::with_capacity(boats.len() + 1);
    rows.push(BoatRecord::columns());
    rows.extend(boats.iter().map(BoatRecord::column_values));
    rows
}

/// Build the workbook in memory and return the `.xlsx` bytes.
pub fn render_spreadsheet(boats: &[BoatRecord]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (row_idx, row) in sheet_rows(boats).into_iter().enumerate() {
        for (col_idx, value) in row.into_iter().enumerate() {
            // Numeric-looking values stay strings, exactly as entered.
            worksheet.write_string(row_idx as u32, col_idx as u16, value)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Write every record to `dir/boat_records.xlsx`.
pub fn export_spreadsheet(boats: &[BoatRecord], dir: &Path) -> Result<PathBuf> {
    let bytes = render_spreadsheet(boats)?;
    write_export(dir, SPREADSHEET_FILE_NAME, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rows_start_with_field_name_headers() {
        let boats = vec![BoatRecord::seed()];
        let rows = sheet_rows(&boats);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "id");
        assert_eq!(rows[0][1], "ownerName");
        assert_eq!(rows[0][20], "updatedAt");
        assert_eq!(rows[1][1], "John Oliver G. Virola");
        assert_eq!(rows[1][18], "25");
    }

    #[test]
    fn empty_collection_still_has_headers() {
        let rows = sheet_rows(&[]);
        assert_eq!(rows, vec![BoatRecord::columns()]);
    }

    #[test]
    fn rendered_workbook_is_a_zip_container() {
        let bytes = render_spreadsheet(&[BoatRecord::seed()]).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn export_uses_fixed_file_name() {
        let tmp = tempfile::tempdir().unwrap();
        let path = export_spreadsheet(&[BoatRecord::seed()], tmp.path()).unwrap();
        assert_eq!(path, tmp.path().join("boat_records.xlsx"));
        assert!(path.metadata().unwrap().len() > 0);
    }
}
