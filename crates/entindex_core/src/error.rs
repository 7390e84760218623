//! Error types for entindex core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, IndexError>;

/// Errors that can occur while indexing a batch.
///
/// None of these are transient: the core performs no I/O, so every error
/// is a data-contract or argument problem and is never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// Bad arguments or a malformed input table.
    #[error("validation error: {message}")]
    Validation {
        /// Description of what was rejected.
        message: String,
    },

    /// A referenced column does not exist in the batch.
    #[error("column not found: {column}")]
    ColumnNotFound {
        /// Name of the missing column.
        column: String,
    },

    /// A column name appears more than once.
    #[error("duplicate column: {column}")]
    DuplicateColumn {
        /// Name of the duplicated column.
        column: String,
    },

    /// A row does not have one value per column.
    #[error("row {row} has {actual} values, expected {expected}")]
    RowWidthMismatch {
        /// Position of the offending row.
        row: usize,
        /// Number of columns in the schema.
        expected: usize,
        /// Number of values in the row.
        actual: usize,
    },

    /// A mapping's index column holds a non-integer value.
    #[error("type mismatch in column {column}: expected integer, found {found}")]
    TypeMismatch {
        /// The column that was checked.
        column: String,
        /// Type name of the offending value.
        found: String,
    },

    /// A chain position is outside the chain.
    #[error("index {index} out of range (valid: -{len}..{len})")]
    ChainIndexOutOfRange {
        /// Requested position (negative counts from the end).
        index: isize,
        /// Number of batches in the chain.
        len: usize,
    },

    /// No batch with the given name exists in the chain.
    #[error("unknown batch: {name}")]
    UnknownBatch {
        /// Name that was looked up.
        name: String,
    },
}

impl IndexError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a column not found error.
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Creates a duplicate column error.
    pub fn duplicate_column(column: impl Into<String>) -> Self {
        Self::DuplicateColumn {
            column: column.into(),
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(column: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            found: found.into(),
        }
    }

    /// Returns true for errors caused by bad arguments or table shape.
    ///
    /// `TypeMismatch` is reported separately; chain lookups are not
    /// validation errors.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::ColumnNotFound { .. }
                | Self::DuplicateColumn { .. }
                | Self::RowWidthMismatch { .. }
        )
    }
}
