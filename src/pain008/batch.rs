use chrono::{Local, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::charset::sepa_clean;
use super::read::read_pain008;
use super::validate::{check_identifier, validate_batch};
use super::xml_utils::{XmlWriter, format_cents};
use super::{PAIN_008_001_02, XSI};
use crate::core::*;

/// Options for one export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// GrpHdr/MsgId; generated from `created_at` plus a random suffix if unset.
    pub message_id: Option<String>,
    /// GrpHdr/CreDtTm.
    pub created_at: NaiveDateTime,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            message_id: None,
            created_at: Local::now().naive_local(),
        }
    }
}

/// A serialized and verified collection file.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub xml: String,
    /// Sum of all instructed amounts in cents.
    pub total_cents: i64,
    pub transactions: usize,
    pub message_id: String,
}

/// All collection orders of one creditor, exported as a single pain.008 file.
///
/// ```
/// use beitragseinzug::core::*;
/// use beitragseinzug::pain008::{DirectDebitBatch, ExportOptions};
/// use chrono::NaiveDate;
///
/// let profile = OrganizationProfile::new(
///     "TSV Musterstadt e.V.",
///     "DE89370400440532013000",
///     "COBADEFFXXX",
///     "DE98ZZZ09999999999",
/// );
/// let mut batch = DirectDebitBatch::new(profile);
/// batch.add_payment(PaymentEntry {
///     name: "Erika Mustermann".into(),
///     iban: "DE02120300000000202051".into(),
///     bic: "BYLADEM1001".into(),
///     amount: 2500,
///     sequence_type: SequenceType::Recurring,
///     collection_date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
///     mandate_id: "M-001".into(),
///     mandate_date: NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
///     description: "Mitgliedsbeitrag November 2026".into(),
/// });
/// let doc = batch.export(&ExportOptions::default()).unwrap();
/// assert_eq!(doc.total_cents, 2500);
/// assert!(doc.xml.contains("<InstdAmt Ccy=\"EUR\">25.00</InstdAmt>"));
/// ```
#[derive(Debug, Clone)]
pub struct DirectDebitBatch {
    profile: OrganizationProfile,
    payments: Vec<PaymentEntry>,
}

impl DirectDebitBatch {
    pub fn new(profile: OrganizationProfile) -> Self {
        Self {
            profile,
            payments: Vec::new(),
        }
    }

    pub fn add_payment(&mut self, payment: PaymentEntry) {
        self.payments.push(payment);
    }

    /// Sum of all amounts in cents.
    pub fn total_cents(&self) -> Result<i64, EinzugError> {
        sum_cents(&self.payments).ok_or_else(|| {
            EinzugError::SerializationType("sum of amounts exceeds the i64 cent range".into())
        })
    }

    /// Validate, serialize and read back the batch.
    ///
    /// Fails with [`EinzugError::Validation`] listing every violation, or
    /// with [`EinzugError::SerializationType`] if the amounts cannot be
    /// summed into a control sum.
    pub fn export(&self, options: &ExportOptions) -> Result<ExportedDocument, EinzugError> {
        let total = self.total_cents()?;

        let profile = OrganizationProfile {
            name: sepa_clean(&self.profile.name),
            ..self.profile.clone()
        };
        let payments: Vec<PaymentEntry> = self
            .payments
            .iter()
            .map(|p| PaymentEntry {
                name: sepa_clean(&p.name),
                description: sepa_clean(&p.description),
                ..p.clone()
            })
            .collect();

        let message_id = options
            .message_id
            .clone()
            .unwrap_or_else(|| generate_message_id(options.created_at));
        let groups = group_payments(&payments);

        let mut errors = validate_batch(&profile, &payments);
        errors.extend(check_identifier(&message_id, "message_id", "GrpHdr/MsgId"));
        for (n, group) in groups.iter().enumerate() {
            let block_id = payment_info_id(&message_id, n);
            errors.extend(check_identifier(&block_id, "payment_info_id", "PmtInf/PmtInfId"));
            if let Some(last) = group.payments.len().checked_sub(1) {
                errors.extend(check_identifier(
                    &end_to_end_id(&block_id, last),
                    "end_to_end_id",
                    "PmtId/EndToEndId",
                ));
            }
        }
        if !errors.is_empty() {
            return Err(EinzugError::Validation(errors));
        }

        let xml = write_document(&profile, &groups, &message_id, options.created_at, total)?;
        verify_document(&xml, total, payments.len())?;

        info!(
            message_id = %message_id,
            transactions = payments.len(),
            total = %cents_to_decimal(total),
            "exported pain.008.001.02 document"
        );
        Ok(ExportedDocument {
            xml,
            total_cents: total,
            transactions: payments.len(),
            message_id,
        })
    }
}

struct PaymentGroup<'a> {
    sequence_type: SequenceType,
    collection_date: NaiveDate,
    payments: Vec<&'a PaymentEntry>,
}

impl PaymentGroup<'_> {
    fn total_cents(&self) -> i64 {
        self.payments.iter().map(|p| p.amount).sum()
    }
}

/// One PmtInf block per (sequence type, collection date), in first-seen order.
fn group_payments(payments: &[PaymentEntry]) -> Vec<PaymentGroup<'_>> {
    let mut groups: Vec<PaymentGroup<'_>> = Vec::new();
    for p in payments {
        match groups
            .iter_mut()
            .find(|g| g.sequence_type == p.sequence_type && g.collection_date == p.collection_date)
        {
            Some(group) => group.payments.push(p),
            None => groups.push(PaymentGroup {
                sequence_type: p.sequence_type,
                collection_date: p.collection_date,
                payments: vec![p],
            }),
        }
    }
    groups
}

fn generate_message_id(created_at: NaiveDateTime) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}{}", created_at.format("%Y%m%d%H%M%S"), &suffix[..8])
}

fn payment_info_id(message_id: &str, block: usize) -> String {
    format!("{message_id}-{}", block + 1)
}

fn end_to_end_id(block_id: &str, index: usize) -> String {
    format!("{block_id}-{}", index + 1)
}

fn write_document(
    profile: &OrganizationProfile,
    groups: &[PaymentGroup<'_>],
    message_id: &str,
    created_at: NaiveDateTime,
    total: i64,
) -> Result<String, EinzugError> {
    let count: usize = groups.iter().map(|g| g.payments.len()).sum();
    let mut w = XmlWriter::new()?;

    w.start_element_with(
        "Document",
        &[("xmlns", PAIN_008_001_02), ("xmlns:xsi", XSI)],
    )?;
    w.start_element("CstmrDrctDbtInitn")?;

    w.start_element("GrpHdr")?;
    w.text_element("MsgId", message_id)?;
    w.text_element("CreDtTm", &created_at.format("%Y-%m-%dT%H:%M:%S").to_string())?;
    w.text_element("NbOfTxs", &count.to_string())?;
    w.text_element("CtrlSum", &format_cents(total))?;
    w.wrapped_text(&["InitgPty", "Nm"], &profile.name)?;
    w.end_element("GrpHdr")?;

    for (n, group) in groups.iter().enumerate() {
        let block_id = payment_info_id(message_id, n);
        write_payment_info(&mut w, profile, group, &block_id)?;
    }

    w.end_element("CstmrDrctDbtInitn")?;
    w.end_element("Document")?;
    w.into_string()
}

fn write_payment_info(
    w: &mut XmlWriter,
    profile: &OrganizationProfile,
    group: &PaymentGroup<'_>,
    block_id: &str,
) -> Result<(), EinzugError> {
    w.start_element("PmtInf")?;
    w.text_element("PmtInfId", block_id)?;
    w.text_element("PmtMtd", "DD")?;
    w.text_element("BtchBookg", if profile.batch_booking { "true" } else { "false" })?;
    w.text_element("NbOfTxs", &group.payments.len().to_string())?;
    w.text_element("CtrlSum", &format_cents(group.total_cents()))?;

    w.start_element("PmtTpInf")?;
    w.wrapped_text(&["SvcLvl", "Cd"], "SEPA")?;
    w.wrapped_text(&["LclInstrm", "Cd"], profile.instrument.code())?;
    w.text_element("SeqTp", group.sequence_type.code())?;
    w.end_element("PmtTpInf")?;

    w.text_element("ReqdColltnDt", &group.collection_date.to_string())?;
    w.wrapped_text(&["Cdtr", "Nm"], &profile.name)?;
    w.wrapped_text(&["CdtrAcct", "Id", "IBAN"], &profile.iban)?;
    w.wrapped_text(&["CdtrAgt", "FinInstnId", "BIC"], &profile.bic)?;
    w.text_element("ChrgBr", "SLEV")?;

    w.start_element("CdtrSchmeId")?;
    w.start_element("Id")?;
    w.start_element("PrvtId")?;
    w.start_element("Othr")?;
    w.text_element("Id", &profile.creditor_id)?;
    w.wrapped_text(&["SchmeNm", "Prtry"], "SEPA")?;
    w.end_element("Othr")?;
    w.end_element("PrvtId")?;
    w.end_element("Id")?;
    w.end_element("CdtrSchmeId")?;

    for (i, p) in group.payments.iter().enumerate() {
        debug!(mandate = %p.mandate_id, amount = p.amount, "writing transaction");
        w.start_element("DrctDbtTxInf")?;
        w.wrapped_text(&["PmtId", "EndToEndId"], &end_to_end_id(block_id, i))?;
        w.amount_element("InstdAmt", p.amount, &profile.currency)?;
        w.start_element("DrctDbtTx")?;
        w.start_element("MndtRltdInf")?;
        w.text_element("MndtId", &p.mandate_id)?;
        w.text_element("DtOfSgntr", &p.mandate_date.to_string())?;
        w.end_element("MndtRltdInf")?;
        w.end_element("DrctDbtTx")?;
        w.wrapped_text(&["DbtrAgt", "FinInstnId", "BIC"], &p.bic)?;
        w.wrapped_text(&["Dbtr", "Nm"], &p.name)?;
        w.wrapped_text(&["DbtrAcct", "Id", "IBAN"], &p.iban)?;
        w.wrapped_text(&["RmtInf", "Ustrd"], &p.description)?;
        w.end_element("DrctDbtTxInf")?;
    }

    w.end_element("PmtInf")?;
    Ok(())
}

/// Read the written document back and compare counts and sums.
fn verify_document(xml: &str, total: i64, count: usize) -> Result<(), EinzugError> {
    let summary = read_pain008(xml)?;
    let expected = cents_to_decimal(total);
    let mut errors = Vec::new();

    let actual_count = summary.transactions().count();
    if summary.declared_transactions != actual_count || actual_count != count {
        errors.push(ValidationError::with_rule(
            "document",
            format!(
                "NbOfTxs {} does not match {} written and {} batched transactions",
                summary.declared_transactions, actual_count, count
            ),
            "GrpHdr/NbOfTxs",
        ));
    }
    if summary.declared_control_sum != expected || summary.amount_total() != expected {
        errors.push(ValidationError::with_rule(
            "document",
            format!(
                "CtrlSum {} does not match instructed amounts {} (expected {})",
                summary.declared_control_sum,
                summary.amount_total(),
                expected
            ),
            "GrpHdr/CtrlSum",
        ));
    }
    for batch in &summary.batches {
        let batch_sum: Decimal = batch.transactions.iter().map(|t| t.amount).sum();
        if batch.declared_control_sum != batch_sum
            || batch.declared_transactions != batch.transactions.len()
        {
            errors.push(ValidationError::with_rule(
                "document",
                format!("PmtInf {} totals are inconsistent", batch.payment_info_id),
                "PmtInf/CtrlSum",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(EinzugError::Validation(errors))
    }
}
