//! Error types for the bond-converter library.
//!
//! Every failure is a [`BondError`]. The variants are grouped by concern and
//! each one maps to an [`ErrorKind`] so hosts can react to the category
//! without matching on every variant:
//!
//! * [`ErrorKind::Parse`] — the input text is not valid JSON (or not UTF-8).
//! * [`ErrorKind::Schema`] — valid JSON, but the trade history we need is
//!   missing, duplicated, or malformed.
//! * [`ErrorKind::Precondition`] — an action was triggered before the step it
//!   depends on (converting before importing, exporting before converting).
//! * [`ErrorKind::Io`] — reading the save file or writing the export failed.
//!
//! [`BondError::user_message`] gives the one-line notification text shown to
//! the user; the `Display` impl carries the full diagnostic for logs.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the bond-converter library.
#[derive(Debug, Error)]
pub enum BondError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Save file was not found at the given path.
    #[error("Save file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Any other I/O failure while reading the save file.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its bytes are not UTF-8 text.
    #[error("Save file '{path}' is not UTF-8 text")]
    NotUtf8 { path: PathBuf },

    // ── Parse errors ──────────────────────────────────────────────────────
    /// The text is not well-formed JSON.
    #[error("Invalid JSON at line {line}, column {column}: {source}")]
    InvalidJson {
        line: usize,
        column: usize,
        #[source]
        source: serde_json::Error,
    },

    // ── Schema errors ─────────────────────────────────────────────────────
    /// The top-level JSON value is not an object.
    #[error("JSON file does not contain expected structure: top level is {found}, not an object")]
    NotAnObject { found: &'static str },

    /// The document has no `trades` field.
    #[error("JSON file does not contain expected structure: missing 'trades'")]
    MissingTrades,

    /// `trades` exists but is not an array.
    #[error("JSON file does not contain expected structure: 'trades' is {found}, not an array")]
    TradesNotArray { found: &'static str },

    /// No record in `trades` carries the target id.
    #[error("JSON file does not contain Old School Bonds data (no trade record with id {id})")]
    RecordNotFound { id: u64 },

    /// More than one record carries the target id; we refuse to guess.
    #[error("Trade record id {id} appears {count} times; expected exactly one")]
    DuplicateRecord { id: u64, count: usize },

    /// The target record has no `h.sO` history.
    #[error("Trade record {id} has no transaction history at 'h.sO'")]
    MissingHistory { id: u64 },

    /// `h.sO` exists but is not an array.
    #[error("Trade record {id}: 'h.sO' is {found}, not an array")]
    EntriesNotArray { id: u64, found: &'static str },

    /// A purchase entry has no usable numeric price.
    #[error("Transaction #{index} ({uuid}) has no numeric price 'p' to derive a conversion cost from")]
    InvalidPrice { index: usize, uuid: String },

    // ── Precondition errors ───────────────────────────────────────────────
    /// Convert (or export) was requested with no file imported.
    #[error("No save file has been imported yet")]
    NothingImported,

    /// Export was requested before the conversion ran.
    #[error("The imported save file has not been converted yet")]
    NotConverted,

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the exported file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Export name must be a bare file name.
    #[error("Invalid export file name '{name}': must be a plain file name")]
    InvalidFileName { name: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`BondError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Schema,
    Precondition,
    Io,
    Config,
    Internal,
}

impl BondError {
    /// Which category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BondError::InvalidJson { .. } | BondError::NotUtf8 { .. } => ErrorKind::Parse,
            BondError::NotAnObject { .. }
            | BondError::MissingTrades
            | BondError::TradesNotArray { .. }
            | BondError::RecordNotFound { .. }
            | BondError::DuplicateRecord { .. }
            | BondError::MissingHistory { .. }
            | BondError::EntriesNotArray { .. }
            | BondError::InvalidPrice { .. } => ErrorKind::Schema,
            BondError::NothingImported | BondError::NotConverted => ErrorKind::Precondition,
            BondError::FileNotFound { .. }
            | BondError::PermissionDenied { .. }
            | BondError::ReadFailed { .. }
            | BondError::OutputWriteFailed { .. }
            | BondError::InvalidFileName { .. } => ErrorKind::Io,
            BondError::InvalidConfig(_) => ErrorKind::Config,
            BondError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Short, human-readable text for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            BondError::InvalidJson { .. } | BondError::NotUtf8 { .. } => {
                "Invalid JSON file.".to_string()
            }
            BondError::RecordNotFound { .. }
            | BondError::MissingHistory { .. }
            | BondError::EntriesNotArray { .. } => {
                "JSON file does not contain Old School Bonds data.".to_string()
            }
            BondError::DuplicateRecord { count, .. } => {
                format!("JSON file contains {count} Old School Bonds records.")
            }
            BondError::NotAnObject { .. }
            | BondError::MissingTrades
            | BondError::TradesNotArray { .. } => {
                "JSON file does not contain expected structure.".to_string()
            }
            BondError::InvalidPrice { index, .. } => {
                format!("Transaction #{index} has no valid price.")
            }
            BondError::NothingImported => "Please choose a file first.".to_string(),
            BondError::NotConverted => "Please convert or import the JSON first.".to_string(),
            BondError::FileNotFound { .. }
            | BondError::PermissionDenied { .. }
            | BondError::ReadFailed { .. } => "Error reading file.".to_string(),
            BondError::OutputWriteFailed { .. } | BondError::InvalidFileName { .. } => {
                "Error writing file.".to_string()
            }
            BondError::InvalidConfig(msg) => format!("Invalid configuration: {msg}"),
            BondError::Internal(_) => "Something went wrong.".to_string(),
        }
    }

    pub(crate) fn from_json(source: serde_json::Error) -> Self {
        BondError::InvalidJson {
            line: source.line(),
            column: source.column(),
            source,
        }
    }
}

/// JSON type name used in schema error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
