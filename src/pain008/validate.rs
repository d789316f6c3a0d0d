use crate::core::*;

use super::charset::is_valid_mandate_id;

/// Largest instructed amount the EPC rulebook allows (999 999 999.99 EUR).
pub const MAX_AMOUNT_CENTS: i64 = 99_999_999_999;

const MAX_NAME: usize = 70;
const MAX_ID: usize = 35;
const MAX_REMITTANCE: usize = 140;

/// Validate a batch against pain.008.001.02 / EPC constraints.
///
/// Text is checked as it will be written, so callers should pass entries
/// that already went through [`sepa_clean`](super::sepa_clean).
/// Returns all errors found.
pub fn validate_batch(
    profile: &OrganizationProfile,
    entries: &[PaymentEntry],
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if profile.currency != "EUR" {
        errors.push(ValidationError::with_rule(
            "creditor.currency",
            format!("SEPA direct debits are EUR only, got '{}'", profile.currency),
            "InstdAmt/@Ccy",
        ));
    }
    check_name(&profile.name, "creditor.name", "Cdtr/Nm", &mut errors);
    if let Err(msg) = validate_iban(&profile.iban) {
        errors.push(ValidationError::with_rule("creditor.iban", msg, "CdtrAcct/IBAN"));
    }
    if let Err(msg) = validate_bic(&profile.bic) {
        errors.push(ValidationError::with_rule("creditor.bic", msg, "CdtrAgt/BIC"));
    }
    if let Err(msg) = validate_creditor_id(&profile.creditor_id) {
        errors.push(ValidationError::with_rule(
            "creditor.creditor_id",
            msg,
            "CdtrSchmeId",
        ));
    }

    if entries.is_empty() {
        errors.push(ValidationError::new(
            "payments",
            "batch must contain at least one payment",
        ));
    }

    for (i, entry) in entries.iter().enumerate() {
        validate_entry(entry, i, &mut errors);
    }

    errors
}

fn validate_entry(entry: &PaymentEntry, index: usize, errors: &mut Vec<ValidationError>) {
    let field = |name: &str| format!("payments[{index}].{name}");

    check_name(&entry.name, &field("name"), "Dbtr/Nm", errors);

    if let Err(msg) = validate_iban(&entry.iban) {
        errors.push(ValidationError::with_rule(field("iban"), msg, "DbtrAcct/IBAN"));
    }
    if let Err(msg) = validate_bic(&entry.bic) {
        errors.push(ValidationError::with_rule(field("bic"), msg, "DbtrAgt/BIC"));
    }

    if !(1..=MAX_AMOUNT_CENTS).contains(&entry.amount) {
        errors.push(ValidationError::with_rule(
            field("amount"),
            format!(
                "amount must be between 0.01 and 999999999.99, got {}",
                cents_to_decimal(entry.amount)
            ),
            "InstdAmt",
        ));
    }

    if entry.mandate_id.chars().count() > MAX_ID {
        errors.push(ValidationError::with_rule(
            field("mandate_id"),
            format!("mandate reference exceeds {MAX_ID} characters"),
            "MndtId",
        ));
    } else if !is_valid_mandate_id(&entry.mandate_id) {
        errors.push(ValidationError::with_rule(
            field("mandate_id"),
            format!(
                "mandate reference '{}' contains characters outside the SEPA set",
                entry.mandate_id
            ),
            "MndtId",
        ));
    }

    if entry.mandate_date > entry.collection_date {
        errors.push(ValidationError::with_rule(
            field("mandate_date"),
            format!(
                "mandate signed on {} is after the collection date {}",
                entry.mandate_date, entry.collection_date
            ),
            "DtOfSgntr",
        ));
    }

    if entry.description.chars().count() > MAX_REMITTANCE {
        errors.push(ValidationError::with_rule(
            field("description"),
            format!("remittance information exceeds {MAX_REMITTANCE} characters"),
            "RmtInf/Ustrd",
        ));
    }
}

fn check_name(name: &str, field: &str, rule: &str, errors: &mut Vec<ValidationError>) {
    let len = name.trim().chars().count();
    if len == 0 {
        errors.push(ValidationError::with_rule(field, "name must not be empty", rule));
    } else if len > MAX_NAME {
        errors.push(ValidationError::with_rule(
            field,
            format!("name exceeds {MAX_NAME} characters"),
            rule,
        ));
    }
}

/// Length check for generated or supplied identifiers (Max35Text).
pub(crate) fn check_identifier(id: &str, field: &str, rule: &str) -> Option<ValidationError> {
    let len = id.chars().count();
    if len == 0 || len > MAX_ID {
        Some(ValidationError::with_rule(
            field,
            format!("identifier must be 1 to {MAX_ID} characters, got {len}"),
            rule,
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn profile() -> OrganizationProfile {
        OrganizationProfile::new(
            "TSV Musterstadt e.V.",
            "DE89370400440532013000",
            "COBADEFFXXX",
            "DE98ZZZ09999999999",
        )
    }

    fn entry() -> PaymentEntry {
        PaymentEntry {
            name: "Erika Mustermann".into(),
            iban: "DE02120300000000202051".into(),
            bic: "BYLADEM1001".into(),
            amount: 2500,
            sequence_type: SequenceType::Recurring,
            collection_date: date(2026, 11, 1),
            mandate_id: "M-001".into(),
            mandate_date: date(2021, 3, 1),
            description: "Mitgliedsbeitrag November 2026".into(),
        }
    }

    #[test]
    fn valid_batch_has_no_errors() {
        assert!(validate_batch(&profile(), &[entry()]).is_empty());
    }

    #[test]
    fn empty_batch_is_rejected() {
        let errors = validate_batch(&profile(), &[]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "payments");
    }

    #[test]
    fn all_entry_errors_are_collected() {
        let bad = PaymentEntry {
            iban: "DE00123".into(),
            bic: "XYZ".into(),
            amount: 0,
            mandate_id: "M 1".into(),
            mandate_date: date(2027, 1, 1),
            ..entry()
        };
        let errors = validate_batch(&profile(), &[entry(), bad]);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "payments[1].iban",
                "payments[1].bic",
                "payments[1].amount",
                "payments[1].mandate_id",
                "payments[1].mandate_date",
            ]
        );
    }

    #[test]
    fn creditor_errors_point_at_creditor() {
        let mut p = profile();
        p.creditor_id = "DE00ZZZ09999999999".into();
        p.name = String::new();
        let errors = validate_batch(&p, &[entry()]);
        assert!(errors.iter().any(|e| e.field == "creditor.creditor_id"));
        assert!(errors.iter().any(|e| e.field == "creditor.name"));
    }

    #[test]
    fn identifier_length() {
        assert!(check_identifier("MSG-1", "message_id", "MsgId").is_none());
        assert!(check_identifier("", "message_id", "MsgId").is_some());
        assert!(check_identifier(&"X".repeat(36), "message_id", "MsgId").is_some());
    }
}
