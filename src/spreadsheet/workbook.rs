use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use crate::core::{Cell, EinzugError, MemberTable};

/// Read one sheet of an `.ods`, `.xlsx`, `.xlsm`, `.xlsb` or `.xls` workbook.
pub fn read_workbook_table(path: &Path, sheet: &str) -> Result<MemberTable, EinzugError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        EinzugError::Spreadsheet(format!("cannot open {}: {e}", path.display()))
    })?;

    let sheets = workbook.sheet_names();
    if !sheets.iter().any(|s| s == sheet) {
        return Err(EinzugError::Spreadsheet(format!(
            "sheet '{sheet}' not found, available: {}",
            sheets.join(", ")
        )));
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| EinzugError::Spreadsheet(format!("cannot read sheet '{sheet}': {e}")))?;

    let mut rows = range.rows();
    let columns: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(|c| c.to_string().trim().to_string()).collect())
        .unwrap_or_default();
    let rows = rows
        .map(|row| row.iter().map(to_cell).collect::<Vec<_>>())
        .filter(|row: &Vec<Cell>| !row.iter().all(Cell::is_blank))
        .collect();

    Ok(MemberTable::new(columns, rows))
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::String(s) => Cell::Text(s.clone()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Float(dt.as_f64())),
        Data::DateTimeIso(s) => match Cell::parse(s) {
            date @ (Cell::Date(_) | Cell::DateTime(_)) => date,
            _ => Cell::Text(s.clone()),
        },
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("#{e:?}")),
    }
}
