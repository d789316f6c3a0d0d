#![no_main]

use beitragseinzug::core::{filter_active, validate_member_table};
use beitragseinzug::spreadsheet::read_csv_from;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Reading, schema checks and the active filter must not panic.
    if let Ok(table) = read_csv_from(data, b';') {
        if validate_member_table(&table).is_ok() {
            let _ = filter_active(&table);
        }
    }
});
