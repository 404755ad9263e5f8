use crate::eval::EvalError;

/// Custom error type for the codemark library
///
/// Using `thiserror` crate for automatic `Error` trait implementation and `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum CodemarkError {
    /// Database-related errors (SQLite)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// One or more working-set rows failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Another record already uses this bookmark identifier
    #[error("Duplicate bookmark identifier: '{0}'")]
    DuplicateBookmark(String),

    /// Bookmark record not found by id
    #[error("Bookmark with ID {0} not found")]
    BookmarkNotFound(i64),

    /// No record carries this bookmark identifier
    #[error("No bookmark named '{0}'")]
    UnknownBookmark(String),

    /// Code evaluation errors
    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Import/Export errors
    #[error("Import/Export error: {0}")]
    ImportExport(String),

    /// Generic error for cases that don't fit other categories
    #[error("{0}")]
    Other(String),
}

/// Result type alias using CodemarkError
pub type Result<T> = std::result::Result<T, CodemarkError>;

impl From<String> for CodemarkError {
    fn from(s: String) -> Self {
        CodemarkError::Other(s)
    }
}

impl From<&str> for CodemarkError {
    fn from(s: &str) -> Self {
        CodemarkError::Other(s.to_string())
    }
}
