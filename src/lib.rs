//! # beitragseinzug
//!
//! Membership fee collection for German clubs: reads the member table
//! (Mitgliedertabelle), picks the active members and produces one SEPA
//! Direct Debit initiation file (pain.008.001.02) for the bank.
//!
//! All amounts are integer cents, never floating point. Decimal rendering
//! goes through [`rust_decimal::Decimal`].
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use beitragseinzug::core::*;
//!
//! let table = MemberTable::new(
//!     REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
//!     vec![vec![
//!         Cell::Text("Mustermann".into()),
//!         Cell::Text("Erika".into()),
//!         Cell::Text("x".into()),
//!         Cell::Date(NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()),
//!         Cell::Text(" DE02120300000000202051 ".into()),
//!         Cell::Text("BYLADEM1001".into()),
//!         Cell::Text("Erika Mustermann".into()),
//!         Cell::Int(2500),
//!         Cell::Text("M-001".into()),
//!     ]],
//! );
//!
//! validate_member_table(&table).unwrap();
//! let members = filter_active(&table).unwrap();
//! let date = determine_collection_date(NaiveDate::from_ymd_opt(2026, 10, 5).unwrap(), 10);
//! let desc = Description::new("Mitgliedsbeitrag", MonthNames::german());
//! let entries = build_payments(&members, date, &desc).unwrap();
//!
//! assert_eq!(entries[0].iban, "DE02120300000000202051");
//! assert_eq!(entries[0].description, "Mitgliedsbeitrag November 2026");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Member table, validation, collection date, payment entries |
//! | `pain008` | pain.008.001.02 generation, schema checks, read-back |
//! | `spreadsheet` | `.ods`/`.xlsx`/`.xls` and `.csv` member table readers |
//! | `config` | TOML club configuration |
//! | `cli` (default) | Everything plus the `beitragseinzug` binary |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "pain008")]
pub mod pain008;

#[cfg(feature = "spreadsheet")]
pub mod spreadsheet;

#[cfg(feature = "config")]
pub mod config;

#[cfg(feature = "cli")]
pub mod pipeline;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
