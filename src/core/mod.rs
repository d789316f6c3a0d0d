//! Core types, member table handling, validation and collection dates.
//!
//! Everything here is independent of the wire format and of the way the
//! member table was read.

mod builder;
mod error;
mod schedule;
pub mod table;
mod types;
mod validation;

pub use builder::*;
pub use error::*;
pub use schedule::*;
pub use table::{Cell, MemberTable, REQUIRED_COLUMNS, filter_active, validate_member_table};
pub use types::*;
pub use validation::*;
