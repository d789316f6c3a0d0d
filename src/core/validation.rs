use super::error::EinzugError;
use super::table::{
    COL_ACCOUNT_HOLDER, COL_AMOUNT, COL_BIC, COL_IBAN, COL_MANDATE_DATE, COL_MANDATE_REFERENCE,
};
use super::types::MemberRecord;

/// Check that every field needed for a collection is filled in.
///
/// Returns the first blank field in column order, naming the member.
pub fn validate_member(member: &MemberRecord) -> Result<(), EinzugError> {
    let blank_text = |v: &Option<String>| v.as_ref().is_none_or(|s| s.trim().is_empty());

    let checks = [
        (COL_MANDATE_DATE, member.mandate_date.is_none()),
        (COL_IBAN, blank_text(&member.iban)),
        (COL_BIC, blank_text(&member.bic)),
        (COL_ACCOUNT_HOLDER, blank_text(&member.account_holder)),
        (COL_AMOUNT, member.amount.is_none()),
        (COL_MANDATE_REFERENCE, blank_text(&member.mandate_reference)),
    ];

    match checks.iter().find(|(_, blank)| *blank) {
        Some((field, _)) => Err(EinzugError::MissingField {
            field: field.to_string(),
            first_name: member.first_name.clone(),
            last_name: member.last_name.clone(),
        }),
        None => Ok(()),
    }
}

/// Validate an IBAN by format and ISO 13616 mod-97 checksum.
pub fn validate_iban(iban: &str) -> Result<(), String> {
    let bytes = iban.as_bytes();
    if !(5..=34).contains(&bytes.len()) {
        return Err(format!("must be 5 to 34 characters, got {}", bytes.len()));
    }
    if !bytes[..2].iter().all(u8::is_ascii_uppercase) {
        return Err("must start with a 2-letter country code".into());
    }
    if !bytes[2..4].iter().all(u8::is_ascii_digit) {
        return Err("check digits must be numeric".into());
    }
    if !bytes[4..].iter().all(u8::is_ascii_alphanumeric) {
        return Err("must contain only letters and digits".into());
    }

    // Move country code and check digits to the end, then mod 97 == 1.
    let rearranged = iban[4..].chars().chain(iban[..4].chars());
    if mod97(rearranged) != Some(1) {
        return Err("checksum mismatch".into());
    }
    Ok(())
}

/// Validate a BIC (ISO 9362), 8 or 11 characters.
pub fn validate_bic(bic: &str) -> Result<(), String> {
    let b = bic.as_bytes();
    if b.len() != 8 && b.len() != 11 {
        return Err(format!("must be 8 or 11 characters, got {}", b.len()));
    }
    if !b[..6].iter().all(u8::is_ascii_uppercase) {
        return Err("bank and country code must be uppercase letters".into());
    }
    let location_ok = (b[6].is_ascii_uppercase() || (b'2'..=b'9').contains(&b[6]))
        && ((b[7].is_ascii_uppercase() && b[7] != b'O') || b[7].is_ascii_digit());
    if !location_ok {
        return Err("invalid location code".into());
    }
    if b.len() == 11 && !b[8..].iter().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return Err("invalid branch code".into());
    }
    Ok(())
}

/// Validate a SEPA creditor identifier, e.g. `DE98ZZZ09999999999`.
///
/// Layout: country code, 2 check digits, 3-character business code
/// (not part of the checksum), national identifier.
pub fn validate_creditor_id(id: &str) -> Result<(), String> {
    let b = id.as_bytes();
    if !(8..=35).contains(&b.len()) {
        return Err(format!("must be 8 to 35 characters, got {}", b.len()));
    }
    if !b[..2].iter().all(u8::is_ascii_uppercase) || !b[2..4].iter().all(u8::is_ascii_digit) {
        return Err("must start with country code and 2 check digits".into());
    }
    if !b[4..].iter().all(u8::is_ascii_alphanumeric) {
        return Err("must contain only letters and digits".into());
    }
    let checked = id[7..].chars().chain(id[..4].chars());
    if mod97(checked) != Some(1) {
        return Err("check digits do not match".into());
    }
    Ok(())
}

/// Piecewise mod 97 over alphanumerics, letters as 10..=35.
fn mod97(chars: impl Iterator<Item = char>) -> Option<u32> {
    let mut rem: u32 = 0;
    for c in chars {
        let value = c.to_digit(36)?;
        rem = if value >= 10 {
            (rem * 100 + value) % 97
        } else {
            (rem * 10 + value) % 97
        };
    }
    Some(rem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn complete_member() -> MemberRecord {
        MemberRecord {
            row: 2,
            last_name: "Mustermann".into(),
            first_name: "Erika".into(),
            active_marker: "x".into(),
            mandate_date: NaiveDate::from_ymd_opt(2021, 3, 1),
            iban: Some("DE89370400440532013000".into()),
            bic: Some("COBADEFFXXX".into()),
            account_holder: Some("Erika Mustermann".into()),
            amount: Some(2500),
            mandate_reference: Some("M-001".into()),
        }
    }

    #[test]
    fn complete_member_passes() {
        assert!(validate_member(&complete_member()).is_ok());
    }

    #[test]
    fn first_blank_field_is_reported() {
        let member = MemberRecord {
            bic: Some("   ".into()),
            mandate_reference: None,
            ..complete_member()
        };
        match validate_member(&member) {
            Err(EinzugError::MissingField { field, first_name, last_name }) => {
                assert_eq!(field, "BIC");
                assert_eq!(first_name, "Erika");
                assert_eq!(last_name, "Mustermann");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn iban_checksum() {
        assert!(validate_iban("DE89370400440532013000").is_ok());
        assert!(validate_iban("DE02120300000000202051").is_ok());
        assert!(validate_iban("GB82WEST12345698765432").is_ok());
        assert_eq!(
            validate_iban("DE89370400440532013001"),
            Err("checksum mismatch".to_string())
        );
        assert!(validate_iban("de89370400440532013000").is_err());
        assert!(validate_iban("DE89 3704 0044 0532 0130 00").is_err());
    }

    #[test]
    fn bic_format() {
        assert!(validate_bic("COBADEFFXXX").is_ok());
        assert!(validate_bic("COBADEFF").is_ok());
        assert!(validate_bic("BYLADEM1001").is_ok());
        assert!(validate_bic("COBADEF").is_err());
        assert!(validate_bic("cobadeffxxx").is_err());
        assert!(validate_bic("COBADE1FXXX").is_err());
        assert!(validate_bic("COBADEFOXXX").is_err());
    }

    #[test]
    fn creditor_id_check_digits() {
        assert!(validate_creditor_id("DE98ZZZ09999999999").is_ok());
        assert!(validate_creditor_id("DE97ZZZ09999999999").is_err());
        assert!(validate_creditor_id("DE98").is_err());
    }
}
