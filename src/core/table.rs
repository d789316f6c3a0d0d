//! Reader-neutral member table, schema check and active-member mapping.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use super::error::EinzugError;
use super::types::MemberRecord;

pub const COL_LAST_NAME: &str = "Nachname";
pub const COL_FIRST_NAME: &str = "Vorname";
pub const COL_ACTIVE: &str = "Aktiv";
pub const COL_MANDATE_DATE: &str = "Datum SEPA Mandat";
pub const COL_IBAN: &str = "IBAN";
pub const COL_BIC: &str = "BIC";
pub const COL_ACCOUNT_HOLDER: &str = "Kontoinhaber";
pub const COL_AMOUNT: &str = "Beitrag";
pub const COL_MANDATE_REFERENCE: &str = "Mandatsreferenz";

/// Columns every member table must carry, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    COL_LAST_NAME,
    COL_FIRST_NAME,
    COL_ACTIVE,
    COL_MANDATE_DATE,
    COL_IBAN,
    COL_BIC,
    COL_ACCOUNT_HOLDER,
    COL_AMOUNT,
    COL_MANDATE_REFERENCE,
];

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Empty cells and whitespace-only text count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Type a raw text value the way a spreadsheet would: integers, decimals,
    /// dates (`YYYY-MM-DD`, `DD.MM.YYYY`, with optional time) and plain text.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return Self::Empty;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Self::Int(i);
        }
        if s.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+')) {
            if let Ok(f) = s.parse::<f64>() {
                return Self::Float(f);
            }
        }
        if let Some(date) = parse_date(s) {
            return Self::Date(date);
        }
        if let Some(dt) = parse_datetime(s) {
            return Self::DateTime(dt);
        }
        Self::Text(raw.to_string())
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Int(_) => "integer",
            Self::Float(_) => "decimal",
            Self::Text(_) => "text",
            Self::Bool(_) => "boolean",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
        }
    }

    /// Whole-number value, if the cell holds one.
    fn as_whole_number(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
                Some(*f as i64)
            }
            _ => None,
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d.%m.%Y"))
        .ok()
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%d.%m.%Y %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Header plus data rows, as read from the member sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemberTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl MemberTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    /// Index of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at (row, column); short rows read as empty.
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&Cell::Empty)
    }
}

/// Check that every required column is present and that `Beitrag` holds
/// whole cents in every row.
pub fn validate_member_table(table: &MemberTable) -> Result<(), EinzugError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| table.column_index(c).is_none())
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(EinzugError::Schema { missing });
    }

    let amount_col = table.column_index(COL_AMOUNT).unwrap_or_default();
    for row in 0..table.rows.len() {
        let cell = table.cell(row, amount_col);
        if cell.as_whole_number().is_none() {
            return Err(EinzugError::ColumnType {
                column: COL_AMOUNT.to_string(),
                detail: format!(
                    "must contain whole numbers (cents), found {} value in row {}",
                    cell.kind(),
                    row + 2
                ),
            });
        }
    }
    Ok(())
}

struct ColumnMap {
    last_name: usize,
    first_name: usize,
    active: usize,
    mandate_date: usize,
    iban: usize,
    bic: usize,
    account_holder: usize,
    amount: usize,
    mandate_reference: usize,
}

impl ColumnMap {
    fn resolve(table: &MemberTable) -> Result<Self, EinzugError> {
        let idx = |name: &str| {
            table.column_index(name).ok_or_else(|| EinzugError::Schema {
                missing: vec![name.to_string()],
            })
        };
        Ok(Self {
            last_name: idx(COL_LAST_NAME)?,
            first_name: idx(COL_FIRST_NAME)?,
            active: idx(COL_ACTIVE)?,
            mandate_date: idx(COL_MANDATE_DATE)?,
            iban: idx(COL_IBAN)?,
            bic: idx(COL_BIC)?,
            account_holder: idx(COL_ACCOUNT_HOLDER)?,
            amount: idx(COL_AMOUNT)?,
            mandate_reference: idx(COL_MANDATE_REFERENCE)?,
        })
    }
}

/// Keep rows with a filled `Aktiv` cell and map them to typed records.
///
/// Any value marks a member as active, whitespace included; only an empty
/// cell excludes it.
/// The mandate date loses its time of day.
pub fn filter_active(table: &MemberTable) -> Result<Vec<MemberRecord>, EinzugError> {
    let cols = ColumnMap::resolve(table)?;
    let mut members = Vec::new();

    for row in 0..table.rows.len() {
        let active = table.cell(row, cols.active);
        if matches!(active, Cell::Empty) {
            continue;
        }
        // header occupies spreadsheet row 1
        let sheet_row = row + 2;
        let text = |col: usize, name: &str| optional_text(table.cell(row, col), sheet_row, name);

        let record = MemberRecord {
            row: sheet_row,
            last_name: text(cols.last_name, COL_LAST_NAME)?.unwrap_or_default(),
            first_name: text(cols.first_name, COL_FIRST_NAME)?.unwrap_or_default(),
            active_marker: cell_text(active).unwrap_or_default(),
            mandate_date: optional_date(table.cell(row, cols.mandate_date), sheet_row)?,
            iban: text(cols.iban, COL_IBAN)?,
            bic: text(cols.bic, COL_BIC)?,
            account_holder: text(cols.account_holder, COL_ACCOUNT_HOLDER)?,
            amount: optional_amount(table.cell(row, cols.amount), sheet_row)?,
            mandate_reference: text(cols.mandate_reference, COL_MANDATE_REFERENCE)?,
        };
        debug!(
            row = sheet_row,
            last_name = %record.last_name,
            marker = %record.active_marker,
            "active member"
        );
        members.push(record);
    }

    info!(active = members.len(), total = table.rows.len(), "filtered member table");
    Ok(members)
}

fn cell_text(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Empty => None,
        Cell::Text(s) => Some(s.clone()),
        Cell::Int(i) => Some(i.to_string()),
        Cell::Float(f) => Some(f.to_string()),
        Cell::Bool(b) => Some(b.to_string()),
        Cell::Date(d) => Some(d.to_string()),
        Cell::DateTime(dt) => Some(dt.to_string()),
    }
}

fn optional_text(cell: &Cell, row: usize, column: &str) -> Result<Option<String>, EinzugError> {
    match cell {
        Cell::Bool(_) | Cell::Date(_) | Cell::DateTime(_) => Err(EinzugError::CellType {
            row,
            column: column.to_string(),
            detail: format!("expected text, found {}", cell.kind()),
        }),
        c if c.is_blank() => Ok(None),
        c => Ok(cell_text(c)),
    }
}

fn optional_date(cell: &Cell, row: usize) -> Result<Option<NaiveDate>, EinzugError> {
    let type_error = |detail: String| EinzugError::CellType {
        row,
        column: COL_MANDATE_DATE.to_string(),
        detail,
    };
    match cell {
        c if c.is_blank() => Ok(None),
        Cell::Date(d) => Ok(Some(*d)),
        Cell::DateTime(dt) => Ok(Some(dt.date())),
        Cell::Text(s) => match Cell::parse(s) {
            Cell::Date(d) => Ok(Some(d)),
            Cell::DateTime(dt) => Ok(Some(dt.date())),
            _ => Err(type_error(format!("'{}' is not a date", s.trim()))),
        },
        other => Err(type_error(format!("expected date, found {}", other.kind()))),
    }
}

fn optional_amount(cell: &Cell, row: usize) -> Result<Option<i64>, EinzugError> {
    if cell.is_blank() {
        return Ok(None);
    }
    cell.as_whole_number()
        .map(Some)
        .ok_or_else(|| EinzugError::CellType {
            row,
            column: COL_AMOUNT.to_string(),
            detail: format!("expected whole cents, found {}", cell.kind()),
        })
}
