use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identity of the collecting club (Verein) for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationProfile {
    /// Creditor name (Cdtr/Nm).
    pub name: String,
    /// Creditor account IBAN.
    pub iban: String,
    /// Creditor agent BIC.
    pub bic: String,
    /// SEPA creditor identifier (Gläubiger-Identifikationsnummer).
    pub creditor_id: String,
    /// Always "EUR".
    pub currency: String,
    /// Local instrument; always CORE.
    pub instrument: LocalInstrument,
    /// Batch booking flag (BtchBookg); always true.
    pub batch_booking: bool,
}

impl OrganizationProfile {
    /// Create a profile. IBAN, BIC and creditor id are trimmed; currency,
    /// instrument and batch booking are fixed.
    pub fn new(
        name: impl Into<String>,
        iban: &str,
        bic: &str,
        creditor_id: &str,
    ) -> Self {
        Self {
            name: name.into(),
            iban: iban.trim().to_string(),
            bic: bic.trim().to_string(),
            creditor_id: creditor_id.trim().to_string(),
            currency: "EUR".to_string(),
            instrument: LocalInstrument::Core,
            batch_booking: true,
        }
    }
}

/// SEPA Direct Debit scheme (LclInstrm/Cd).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocalInstrument {
    /// SEPA Core Direct Debit.
    Core,
}

impl LocalInstrument {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Core => "CORE",
        }
    }
}

/// Direct debit sequence type (SeqTp). Only recurring collections are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceType {
    /// RCUR, recurring collection.
    Recurring,
}

impl SequenceType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Recurring => "RCUR",
        }
    }
}

/// One member row, typed. Critical fields stay optional until
/// [`validate_member`](super::validate_member) has run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemberRecord {
    /// 1-based spreadsheet row (header is row 1).
    pub row: usize,
    /// Nachname.
    pub last_name: String,
    /// Vorname.
    pub first_name: String,
    /// Raw content of the Aktiv cell; non-empty by construction after filtering.
    pub active_marker: String,
    /// Datum SEPA Mandat.
    pub mandate_date: Option<NaiveDate>,
    /// IBAN, untrimmed.
    pub iban: Option<String>,
    /// BIC, untrimmed.
    pub bic: Option<String>,
    /// Kontoinhaber.
    pub account_holder: Option<String>,
    /// Beitrag in cents.
    pub amount: Option<i64>,
    /// Mandatsreferenz, untrimmed.
    pub mandate_reference: Option<String>,
}

/// A single collection order for the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEntry {
    /// Debtor name (account holder).
    pub name: String,
    pub iban: String,
    pub bic: String,
    /// Amount in cents.
    pub amount: i64,
    pub sequence_type: SequenceType,
    pub collection_date: NaiveDate,
    pub mandate_id: String,
    pub mandate_date: NaiveDate,
    /// Remittance information (Verwendungszweck).
    pub description: String,
}

/// Month names used in the remittance text, indexed January first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthNames([String; 12]);

impl MonthNames {
    pub fn new(names: [String; 12]) -> Self {
        Self(names)
    }

    /// German month names, as printed on bank statements.
    pub fn german() -> Self {
        Self([
            "Januar",
            "Februar",
            "März",
            "April",
            "Mai",
            "Juni",
            "Juli",
            "August",
            "September",
            "Oktober",
            "November",
            "Dezember",
        ]
        .map(String::from))
    }

    /// Name for a date's month.
    pub fn for_date(&self, date: NaiveDate) -> &str {
        &self.0[date.month0() as usize]
    }
}

impl Default for MonthNames {
    fn default() -> Self {
        Self::german()
    }
}

impl TryFrom<Vec<String>> for MonthNames {
    type Error = usize;

    /// Fails with the actual length when the list does not have 12 entries.
    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        let len = names.len();
        let names: [String; 12] = names.try_into().map_err(|_| len)?;
        Ok(Self(names))
    }
}

/// Remittance text template: configured phrase followed by month and year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub phrase: String,
    pub months: MonthNames,
}

impl Description {
    pub fn new(phrase: impl Into<String>, months: MonthNames) -> Self {
        Self {
            phrase: phrase.into(),
            months,
        }
    }

    /// e.g. "Mitgliedsbeitrag November 2026".
    pub fn render(&self, collection_date: NaiveDate) -> String {
        format!(
            "{} {} {}",
            self.phrase,
            self.months.for_date(collection_date),
            collection_date.year()
        )
    }
}

/// Cents as a two-decimal amount.
pub fn cents_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Operator display of a cent amount, e.g. `4499` → "44.99 €".
pub fn format_euro(cents: i64) -> String {
    format!("{} €", cents_to_decimal(cents))
}
