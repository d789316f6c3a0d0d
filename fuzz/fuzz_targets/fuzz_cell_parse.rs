#![no_main]

use beitragseinzug::pain008::{is_valid_mandate_id, sepa_clean};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = beitragseinzug::core::Cell::parse(s);
        let cleaned = sepa_clean(s);
        assert_eq!(sepa_clean(&cleaned), cleaned);
        let _ = is_valid_mandate_id(&cleaned);
    }
});
