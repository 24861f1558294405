//! Error types for the lead chart pipeline.
//!
//! Every fallible operation in the library returns [`LeadChartsError`]. Errors
//! are serializable as `{code, message}` so a front end can display them
//! without matching on Rust types.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the lead chart pipeline.
#[derive(Error, Debug)]
pub enum LeadChartsError {
    /// A raw record did not carry the expected number of positional columns.
    ///
    /// `row` is the zero-based data row index, or `None` when the whole table
    /// has the wrong width.
    #[error("Schema mismatch{}: expected {expected} columns, found {found}", fmt_row(.row))]
    SchemaMismatch {
        row: Option<usize>,
        expected: usize,
        found: usize,
    },

    /// Two rows of the same export share an id.
    #[error("Duplicate lead id '{id}' at row {row}")]
    DuplicateLeadId { id: String, row: usize },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<LeadChartsError>,
    },
}

fn fmt_row(row: &Option<usize>) -> String {
    match row {
        Some(row) => format!(" at row {}", row),
        None => String::new(),
    }
}

impl LeadChartsError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        LeadChartsError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SchemaMismatch { .. } => "SCHEMA_MISMATCH",
            Self::DuplicateLeadId { .. } => "DUPLICATE_LEAD_ID",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is a schema mismatch, looking through context wrappers.
    pub fn is_schema_mismatch(&self) -> bool {
        match self {
            Self::SchemaMismatch { .. } => true,
            Self::WithContext { source, .. } => source.is_schema_mismatch(),
            _ => false,
        }
    }

    /// Check if this error is recoverable by changing parameters rather than
    /// supplying a different export.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidConfig(_) => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

impl From<crate::config::ConfigValidationError> for LeadChartsError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        LeadChartsError::InvalidConfig(err.to_string())
    }
}

/// Serialized as a struct with `code` and `message` fields.
impl Serialize for LeadChartsError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("LeadChartsError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, LeadChartsError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| LeadChartsError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| LeadChartsError::Io(e).with_context(context))
    }
}
