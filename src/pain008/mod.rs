//! SEPA Direct Debit initiation (pain.008.001.02) generation and read-back.
//!
//! All payments of one creditor go into a single document; payments sharing
//! sequence type and collection date share one `PmtInf` block.
//!
//! # Example
//!
//! ```no_run
//! use beitragseinzug::core::*;
//! use beitragseinzug::pain008::{DirectDebitBatch, ExportOptions};
//!
//! let profile: OrganizationProfile = todo!();
//! let entries: Vec<PaymentEntry> = todo!(); // via build_payments
//! let mut batch = DirectDebitBatch::new(profile);
//! for entry in entries {
//!     batch.add_payment(entry);
//! }
//! let doc = batch.export(&ExportOptions::default()).unwrap();
//! println!("Gesamtbetrag: {}", format_euro(doc.total_cents));
//! ```

mod batch;
mod charset;
mod read;
mod validate;
pub(crate) mod xml_utils;

pub use batch::{DirectDebitBatch, ExportOptions, ExportedDocument};
pub use charset::{is_valid_mandate_id, sepa_clean};
pub use read::{BatchSummary, Pain008Summary, TransactionSummary, read_pain008};
pub use validate::{MAX_AMOUNT_CENTS, validate_batch};

/// pain.008.001.02 namespace URI.
pub const PAIN_008_001_02: &str = "urn:iso:std:iso:20022:tech:xsd:pain.008.001.02";

/// XML Schema instance namespace.
pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
