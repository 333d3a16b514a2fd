//! Custom error types for the foam-reader crate.

use std::path::PathBuf;
use thiserror::Error;

use super::models::FieldCategory;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum FoamError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Neither the plain nor the `.gz` variant of a file exists.
    #[error("No such file: {} (also probed the .gz variant)", path.display())]
    PathNotFound { path: PathBuf },

    /// The header `class` token does not name a scalar, vector, tensor or symmTensor field.
    #[error("Unsupported field type: {0}")]
    UnsupportedFieldType(String),

    /// The caller asked for one field category but the file declares another.
    #[error("{} holds a {found} field, not a {expected} field", path.display())]
    TypeMismatch {
        path: PathBuf,
        expected: FieldCategory,
        found: FieldCategory,
    },

    /// Requested extents do not multiply to the decoded element count.
    #[error("Cannot reshape {expected} elements into shape {shape:?}")]
    ShapeMismatch { expected: usize, shape: Vec<usize> },

    /// The dictionary/list structure is malformed.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A required keyword is absent.
    #[error("Missing entry '{key}' in {context}")]
    MissingEntry { context: String, key: String },

    /// The named boundary patch is not declared.
    #[error("Boundary patch not found: {0}")]
    PatchNotFound(String),

    /// A declared count of items does not match the actual number of items found.
    #[error("Count mismatch for {item_type}: expected {expected}, but found {found}")]
    CountMismatch {
        item_type: &'static str,
        expected: u64,
        found: u64,
    },

    /// A binary payload has an unexpected size.
    #[error("Size mismatch for {context}: expected {expected} bytes, but found {found} bytes")]
    SizeMismatch {
        context: String,
        expected: u64,
        found: u64,
    },

    /// The file is structurally valid but its content is inconsistent.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// A convenience `Result` type alias using the crate's `FoamError` type.
pub type Result<T> = std::result::Result<T, FoamError>;
