//! Database error types.
//!
//! Every failure a store can report falls into one of four categories.
//! Driver errors are classified once, in the storage adapter, and callers
//! route on [`DbError::kind`] without looking at driver details.
//! It uses miette for diagnostic output and thiserror for derive macros.

use miette::Diagnostic;
use thiserror::Error;

/// Database operation errors.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    /// A uniqueness rule was violated (duplicate email and similar).
    #[error("Conflict: {message}")]
    #[diagnostic(code(jobboard::db::conflict))]
    Conflict { message: String },

    /// The caller supplied data the schema rejects.
    #[error("Bad request: {message}")]
    #[diagnostic(code(jobboard::db::bad_request))]
    BadRequest { message: String },

    /// A lookup matched no rows.
    #[error("Not found: {message}")]
    #[diagnostic(code(jobboard::db::not_found))]
    NotFound { message: String },

    /// Anything else: driver, I/O, pool, decoding, or an expired deadline.
    #[error("Internal error: {message}")]
    #[diagnostic(code(jobboard::db::internal))]
    Internal { message: String },
}

/// Error category, for callers that only need to branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Conflict,
    BadRequest,
    NotFound,
    Internal,
}

impl DbError {
    pub fn conflict(message: impl Into<String>) -> Self {
        DbError::Conflict {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        DbError::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DbError::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DbError::Internal {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::Conflict { .. } => ErrorKind::Conflict,
            DbError::BadRequest { .. } => ErrorKind::BadRequest,
            DbError::NotFound { .. } => ErrorKind::NotFound,
            DbError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Human-readable cause without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            DbError::Conflict { message }
            | DbError::BadRequest { message }
            | DbError::NotFound { message }
            | DbError::Internal { message } => message,
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
