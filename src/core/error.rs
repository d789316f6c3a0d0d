use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while turning a member table into a collection file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EinzugError {
    /// The member table file does not exist.
    #[error("input file {} does not exist", .0.display())]
    MissingInputFile(PathBuf),

    /// The configuration file does not exist.
    #[error("configuration file {} does not exist", .0.display())]
    MissingConfigFile(PathBuf),

    /// The configuration file could not be parsed or is incomplete.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The spreadsheet could not be opened or the sheet is missing.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Required columns are absent from the member table.
    #[error("member table is missing the columns {}", format_columns(.missing))]
    Schema { missing: Vec<String> },

    /// A column has the wrong datatype.
    #[error("column '{column}' {detail}")]
    ColumnType { column: String, detail: String },

    /// A single cell has a shape that cannot be mapped to its field.
    #[error("row {row}, column '{column}': {detail}")]
    CellType {
        row: usize,
        column: String,
        detail: String,
    },

    /// A critical field is blank for an active member.
    #[error("'{field}' is empty for {first_name} {last_name}")]
    MissingField {
        field: String,
        first_name: String,
        last_name: String,
    },

    /// The assembled batch violates pain.008.001.02 constraints.
    #[error("batch failed schema validation: {}", format_violations(.0))]
    Validation(Vec<ValidationError>),

    /// A value of the wrong runtime shape reached the serializer.
    #[error("serialization type error: {0}")]
    SerializationType(String),

    /// XML generation or read-back error.
    #[error("XML error: {0}")]
    Xml(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EinzugError {
    /// Process exit code for this error class. Never zero.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingInputFile(_) => 2,
            Self::MissingConfigFile(_) => 3,
            Self::Config(_) => 4,
            Self::Spreadsheet(_) => 5,
            Self::Schema { .. } => 10,
            Self::ColumnType { .. } | Self::CellType { .. } => 11,
            Self::MissingField { .. } => 12,
            Self::Validation(_) => 20,
            Self::SerializationType(_) => 21,
            Self::Xml(_) => 22,
            Self::Io(_) => 30,
        }
    }
}

fn format_columns(columns: &[String]) -> String {
    let quoted: Vec<String> = columns.iter().map(|c| format!("'{c}'")).collect();
    quoted.join(", ")
}

fn format_violations(errors: &[ValidationError]) -> String {
    let parts: Vec<String> = errors.iter().map(ToString::to_string).collect();
    parts.join("; ")
}

/// A single schema violation with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "payments[2].iban").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// pain.008 element the rule stems from, if applicable (e.g. "DbtrAcct/IBAN").
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without an element reference.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create a validation error tied to a pain.008 element.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}
