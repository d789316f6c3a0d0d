#![cfg(feature = "core")]

//! Member table, collection date and payment entry tests.

use beitragseinzug::core::*;
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn header() -> Vec<String> {
    REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect()
}

fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

fn member_row(last: &str, first: &str, active: Cell, amount: i64, mandate: &str) -> Vec<Cell> {
    vec![
        text(last),
        text(first),
        active,
        Cell::Date(date(2021, 3, 1)),
        text("DE02120300000000202051"),
        text("BYLADEM1001"),
        text(&format!("{first} {last}")),
        Cell::Int(amount),
        text(mandate),
    ]
}

// ── Table Schema ────────────────────────────────────────────────────────────

#[test]
fn missing_columns_are_named_exactly() {
    let columns: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !matches!(**c, "BIC" | "Mandatsreferenz"))
        .map(|c| c.to_string())
        .collect();
    let table = MemberTable::new(columns, vec![]);

    let err = validate_member_table(&table).unwrap_err();
    match &err {
        EinzugError::Schema { missing } => {
            assert_eq!(missing, &vec!["BIC".to_string(), "Mandatsreferenz".to_string()]);
        }
        other => panic!("expected schema error, got {other:?}"),
    }
    assert_eq!(err.exit_code(), 10);
}

#[test]
fn extra_columns_are_ignored() {
    let mut columns = header();
    columns.insert(2, "Telefon".into());
    let mut row = member_row("Mustermann", "Erika", text("x"), 2500, "M-001");
    row.insert(2, text("0123 456"));
    let table = MemberTable::new(columns, vec![row]);

    validate_member_table(&table).unwrap();
    let members = filter_active(&table).unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].active_marker, "x");
}

#[test]
fn text_in_amount_column_is_a_column_type_error() {
    let mut row = member_row("Mustermann", "Erika", text("x"), 0, "M-001");
    row[7] = text("25,00");
    let table = MemberTable::new(header(), vec![row]);

    let err = validate_member_table(&table).unwrap_err();
    assert!(matches!(err, EinzugError::ColumnType { ref column, .. } if column == "Beitrag"));
    assert_eq!(err.exit_code(), 11);
}

// ── Active Filter ───────────────────────────────────────────────────────────

#[test]
fn only_rows_with_a_filled_marker_are_active() {
    let table = MemberTable::new(
        header(),
        vec![
            member_row("Mustermann", "Erika", text("x"), 2500, "M-001"),
            member_row("Muster", "Max", Cell::Empty, 1999, "M-002"),
            member_row("Beispiel", "Berta", Cell::Int(1), 1999, "M-003"),
            member_row("Leer", "Lena", text("   "), 1000, "M-004"),
        ],
    );

    let members = filter_active(&table).unwrap();
    let names: Vec<&str> = members.iter().map(|m| m.last_name.as_str()).collect();
    assert_eq!(names, vec!["Mustermann", "Beispiel", "Leer"]);
    assert_eq!(members[0].row, 2);
    assert_eq!(members[1].row, 4);
    assert_eq!(members[1].active_marker, "1");
    assert_eq!(members[2].active_marker, "   ");
}

#[test]
fn mandate_datetime_loses_time_of_day() {
    let mut row = member_row("Mustermann", "Erika", text("x"), 2500, "M-001");
    row[3] = Cell::DateTime(date(2021, 3, 1).and_hms_opt(14, 30, 0).unwrap());
    let table = MemberTable::new(header(), vec![row]);

    let members = filter_active(&table).unwrap();
    assert_eq!(members[0].mandate_date, Some(date(2021, 3, 1)));
}

#[test]
fn unparsable_mandate_date_is_a_cell_error() {
    let mut row = member_row("Mustermann", "Erika", text("x"), 2500, "M-001");
    row[3] = text("irgendwann");
    let table = MemberTable::new(header(), vec![row]);

    let err = filter_active(&table).unwrap_err();
    assert!(matches!(err, EinzugError::CellType { row: 2, .. }));
    assert_eq!(err.exit_code(), 11);
}

// ── Collection Date ─────────────────────────────────────────────────────────

#[test]
fn early_in_month_collects_on_the_first() {
    assert_eq!(determine_collection_date(date(2026, 10, 10), 10), date(2026, 11, 1));
    assert_eq!(determine_collection_date(date(2026, 1, 1), 10), date(2026, 2, 1));
}

#[test]
fn late_in_short_month_uses_minimum_delta() {
    // 28 September: 1 October is only three days away
    assert_eq!(determine_collection_date(date(2026, 9, 28), 10), date(2026, 10, 8));
}

#[test]
fn late_in_long_month_uses_minimum_delta() {
    assert_eq!(determine_collection_date(date(2026, 10, 28), 10), date(2026, 11, 7));
    assert_eq!(determine_collection_date(date(2026, 10, 29), 10), date(2026, 11, 8));
}

#[test]
fn year_rolls_over() {
    assert_eq!(determine_collection_date(date(2026, 12, 5), 10), date(2027, 1, 1));
    assert_eq!(determine_collection_date(date(2026, 12, 28), 10), date(2027, 1, 7));
}

#[test]
fn zero_delta_always_takes_the_first() {
    assert_eq!(determine_collection_date(date(2026, 2, 28), 0), date(2026, 3, 1));
}

// ── Payment Entries ─────────────────────────────────────────────────────────

#[test]
fn entries_are_trimmed_and_described() {
    let record = MemberRecord {
        row: 2,
        last_name: "Mustermann".into(),
        first_name: "Erika".into(),
        active_marker: "x".into(),
        mandate_date: Some(date(2021, 3, 1)),
        iban: Some("  DE02120300000000202051 ".into()),
        bic: Some(" BYLADEM1001".into()),
        account_holder: Some("Erika Mustermann ".into()),
        amount: Some(2500),
        mandate_reference: Some(" M-001 ".into()),
    };
    let desc = Description::new("Mitgliedsbeitrag", MonthNames::german());

    let entry = PaymentEntry::from_member(&record, date(2026, 11, 1), &desc).unwrap();
    assert_eq!(entry.iban, "DE02120300000000202051");
    assert_eq!(entry.bic, "BYLADEM1001");
    assert_eq!(entry.mandate_id, "M-001");
    assert_eq!(entry.name, "Erika Mustermann ");
    assert_eq!(entry.amount, 2500);
    assert_eq!(entry.sequence_type, SequenceType::Recurring);
    assert_eq!(entry.description, "Mitgliedsbeitrag November 2026");
}

#[test]
fn blank_mandate_reference_names_the_member() {
    let table = MemberTable::new(
        header(),
        vec![
            member_row("Mustermann", "Erika", text("x"), 2500, "M-001"),
            member_row("Muster", "Max", text("x"), 1999, "  "),
        ],
    );
    let members = filter_active(&table).unwrap();
    let desc = Description::new("Beitrag", MonthNames::german());

    let err = build_payments(&members, date(2026, 11, 1), &desc).unwrap_err();
    assert_eq!(err.to_string(), "'Mandatsreferenz' is empty for Max Muster");
    assert_eq!(err.exit_code(), 12);
}

#[test]
fn first_blank_field_in_column_order_is_reported() {
    let record = MemberRecord {
        first_name: "Erika".into(),
        last_name: "Mustermann".into(),
        mandate_date: Some(date(2021, 3, 1)),
        amount: Some(2500),
        ..Default::default()
    };
    let err = validate_member(&record).unwrap_err();
    assert!(matches!(err, EinzugError::MissingField { ref field, .. } if field == "IBAN"));
}

#[test]
fn totals_render_as_euro() {
    let desc = Description::new("Beitrag", MonthNames::german());
    let members = filter_active(&MemberTable::new(
        header(),
        vec![
            member_row("Mustermann", "Erika", text("x"), 2500, "M-001"),
            member_row("Muster", "Max", text("x"), 1999, "M-002"),
        ],
    ))
    .unwrap();

    let entries = build_payments(&members, date(2026, 11, 1), &desc).unwrap();
    assert_eq!(sum_cents(&entries), Some(4499));
    assert_eq!(format_euro(4499), "44.99 €");
}
