use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::error::EinzugError;
use super::table::{
    COL_ACCOUNT_HOLDER, COL_AMOUNT, COL_BIC, COL_IBAN, COL_MANDATE_DATE, COL_MANDATE_REFERENCE,
};
use super::types::*;
use super::validation::validate_member;

impl PaymentEntry {
    /// Build the collection order for one validated member.
    ///
    /// IBAN, BIC and mandate reference are trimmed; the account holder is
    /// taken verbatim and the amount is used as cents without scaling.
    /// Fails like [`validate_member`] if a critical field is blank.
    pub fn from_member(
        member: &MemberRecord,
        collection_date: NaiveDate,
        description: &Description,
    ) -> Result<Self, EinzugError> {
        validate_member(member)?;
        let missing = |field: &str| EinzugError::MissingField {
            field: field.to_string(),
            first_name: member.first_name.clone(),
            last_name: member.last_name.clone(),
        };

        Ok(Self {
            name: member
                .account_holder
                .clone()
                .ok_or_else(|| missing(COL_ACCOUNT_HOLDER))?,
            iban: trimmed(&member.iban).ok_or_else(|| missing(COL_IBAN))?,
            bic: trimmed(&member.bic).ok_or_else(|| missing(COL_BIC))?,
            amount: member.amount.ok_or_else(|| missing(COL_AMOUNT))?,
            sequence_type: SequenceType::Recurring,
            collection_date,
            mandate_id: trimmed(&member.mandate_reference)
                .ok_or_else(|| missing(COL_MANDATE_REFERENCE))?,
            mandate_date: member
                .mandate_date
                .ok_or_else(|| missing(COL_MANDATE_DATE))?,
            description: description.render(collection_date),
        })
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::trim).map(str::to_string)
}

/// Validate every member and build its payment entry, stopping at the first
/// invalid member. No entries are returned unless all members are valid.
pub fn build_payments(
    members: &[MemberRecord],
    collection_date: NaiveDate,
    description: &Description,
) -> Result<Vec<PaymentEntry>, EinzugError> {
    let mut entries = Vec::with_capacity(members.len());
    for member in members {
        let entry = PaymentEntry::from_member(member, collection_date, description)?;
        if entry.amount <= 0 {
            warn!(
                row = member.row,
                amount = entry.amount,
                "non-positive contribution for {} {}",
                member.first_name,
                member.last_name
            );
        }
        debug!(row = member.row, mandate = %entry.mandate_id, amount = entry.amount, "payment entry");
        entries.push(entry);
    }
    info!(
        entries = entries.len(),
        collection_date = %collection_date,
        "built payment entries"
    );
    Ok(entries)
}

/// Sum of entry amounts in cents, or `None` on overflow.
pub fn sum_cents(entries: &[PaymentEntry]) -> Option<i64> {
    entries.iter().try_fold(0i64, |acc, e| acc.checked_add(e.amount))
}
