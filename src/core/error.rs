use thiserror::Error;

/// Error type definitions
#[derive(Error, Debug)]
pub enum Error {
    #[error("shape mismatch: lengths {left} and {right} are incompatible")]
    ShapeMismatch { left: usize, right: usize },

    #[error("alignment mismatch: {0}")]
    AlignmentMismatch(String),

    #[error("unsupported operation: {op} between {left} and {right}")]
    UnsupportedOperation {
        op: String,
        left: String,
        right: String,
    },

    #[error("backend capability: {0}")]
    BackendCapability(String),

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("duplicate column name: {0}")]
    DuplicateColumnName(String),

    #[error("duplicate index label: {0}")]
    DuplicateIndexLabel(String),

    #[error("inconsistent row count: expected {expected}, found {found}")]
    InconsistentRowCount { expected: usize, found: usize },

    #[error("index out of bounds: index {index}, size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error("unsupported api version: {0}")]
    UnsupportedApiVersion(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("cast error: cannot cast {from} to {to}")]
    Cast { from: String, to: String },
}

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
