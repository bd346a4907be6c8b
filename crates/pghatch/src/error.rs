//! Error types for pghatch

use thiserror::Error;

/// Result type alias for pghatch operations
pub type QbResult<T> = Result<T, QbError>;

/// Error types for building, rendering and executing statements
#[derive(Debug, Error)]
pub enum QbError {
    /// Malformed builder state (empty AND/OR, empty IN, missing FROM, ...)
    #[error("Builder error: {0}")]
    Builder(String),

    /// INSERT row width does not match the column list
    #[error("Column arity mismatch: expected {expected} values, got {got}")]
    ColumnArityMismatch { expected: usize, got: usize },

    /// Function name not present in the registry
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// The renderer cannot express this construct as SQL
    #[error("Unsupported construct: {0}")]
    UnsupportedConstruct(String),

    /// Catalog document could not be loaded
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),
}

impl QbError {
    /// Create a builder error
    pub fn builder(message: impl Into<String>) -> Self {
        Self::Builder(message.into())
    }

    /// Create an unsupported-construct error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedConstruct(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is a builder error
    pub fn is_builder(&self) -> bool {
        matches!(self, Self::Builder(_))
    }

    /// Check if this is an unsupported-construct error
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedConstruct(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<serde_json::Error> for QbError {
    fn from(err: serde_json::Error) -> Self {
        Self::Catalog(err.to_string())
    }
}
