//! Member table readers for spreadsheet workbooks and CSV exports.

mod csv_table;
mod workbook;

use std::path::Path;

use tracing::info;

use crate::core::{EinzugError, MemberTable};

pub use csv_table::{read_csv_from, read_csv_table};
pub use workbook::read_workbook_table;

/// Sheet holding the member list unless told otherwise.
pub const DEFAULT_SHEET: &str = "Mitglieder";

/// Read the member table from `path`, choosing the reader by extension.
/// `sheet` is ignored for CSV files.
pub fn read_member_table(path: &Path, sheet: &str) -> Result<MemberTable, EinzugError> {
    if !path.is_file() {
        return Err(EinzugError::MissingInputFile(path.to_path_buf()));
    }

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let table = if is_csv {
        read_csv_table(path)?
    } else {
        read_workbook_table(path, sheet)?
    };
    info!(
        path = %path.display(),
        columns = table.columns.len(),
        rows = table.rows.len(),
        "read member table"
    );
    Ok(table)
}
