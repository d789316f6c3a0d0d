use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;

use crate::core::table::{COL_AMOUNT, COL_MANDATE_DATE};
use crate::core::{Cell, EinzugError, MemberTable};

/// Read a CSV export of the member sheet. The delimiter (`;` or `,`) is
/// taken from whichever occurs more often in the header line.
pub fn read_csv_table(path: &Path) -> Result<MemberTable, EinzugError> {
    let mut header_line = String::new();
    BufReader::new(File::open(path)?).read_line(&mut header_line)?;
    let delimiter = detect_delimiter(&header_line);

    read_csv_from(File::open(path)?, delimiter)
}

fn detect_delimiter(header: &str) -> u8 {
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if semicolons > commas { b';' } else { b',' }
}

/// Parse CSV data with a header row into a table.
///
/// Only `Beitrag` and `Datum SEPA Mandat` are typed by parsing; every other
/// column keeps its raw text so identifiers such as `000123` survive.
pub fn read_csv_from<R: Read>(reader: R, delimiter: u8) -> Result<MemberTable, EinzugError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let csv_error = |e: csv::Error| EinzugError::Spreadsheet(format!("CSV error: {e}"));

    let columns: Vec<String> = rdr
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let typed: Vec<bool> = columns
        .iter()
        .map(|c| c == COL_AMOUNT || c == COL_MANDATE_DATE)
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(csv_error)?;
        let row: Vec<Cell> = record
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                if typed.get(i).copied().unwrap_or(false) {
                    Cell::parse(raw)
                } else {
                    raw_cell(raw)
                }
            })
            .collect();
        // separator-only lines left behind by spreadsheet exports
        if !row.iter().all(Cell::is_blank) {
            rows.push(row);
        }
    }

    Ok(MemberTable::new(columns, rows))
}

fn raw_cell(raw: &str) -> Cell {
    if raw.is_empty() {
        Cell::Empty
    } else {
        Cell::Text(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semicolon_csv_is_detected() {
        assert_eq!(detect_delimiter("Nachname;Vorname;Aktiv"), b';');
        assert_eq!(detect_delimiter("Nachname,Vorname,Aktiv"), b',');
    }

    #[test]
    fn cells_are_typed() {
        let data = "\u{feff}Nachname;Beitrag;Datum SEPA Mandat\nMustermann;2500;01.03.2021\n";
        let table = read_csv_from(data.as_bytes(), b';').unwrap();
        assert_eq!(table.columns, vec!["Nachname", "Beitrag", "Datum SEPA Mandat"]);
        assert_eq!(table.rows[0][0], Cell::Text("Mustermann".into()));
        assert_eq!(table.rows[0][1], Cell::Int(2500));
        assert!(matches!(table.rows[0][2], Cell::Date(_)));
    }

    #[test]
    fn identifier_columns_keep_raw_text() {
        let data = "Mandatsreferenz;IBAN;Beitrag\n000123;DE02120300000000202051;1200\n2021.10;x;1200\n";
        let table = read_csv_from(data.as_bytes(), b';').unwrap();
        assert_eq!(table.rows[0][0], Cell::Text("000123".into()));
        assert_eq!(table.rows[1][0], Cell::Text("2021.10".into()));
        assert_eq!(table.rows[0][2], Cell::Int(1200));
    }

    #[test]
    fn whitespace_marker_is_kept_as_text() {
        let data = "Aktiv;Beitrag\n ;100\n;200\n";
        let table = read_csv_from(data.as_bytes(), b';').unwrap();
        assert_eq!(table.rows[0][0], Cell::Text(" ".into()));
        assert_eq!(table.rows[1][0], Cell::Empty);
    }

    #[test]
    fn separator_only_lines_are_skipped() {
        let data = "A;B\n1;2\n;\n";
        let table = read_csv_from(data.as_bytes(), b';').unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn short_rows_are_tolerated() {
        let data = "A,B,C\n1\n";
        let table = read_csv_from(data.as_bytes(), b',').unwrap();
        assert_eq!(table.rows[0].len(), 1);
        assert_eq!(table.cell(0, 2), &Cell::Empty);
    }
}
