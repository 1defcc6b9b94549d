//! Translation of sqlx failures into the [`DbError`] taxonomy.
//!
//! This is the only place that looks at driver error codes. Stores call
//! [`write_error`] for statements that modify data and [`read_error`] for
//! lookups; both log the classified failure once inside the caller's span.

use sqlx::error::ErrorKind as DriverErrorKind;
use tracing::{error, warn};

use crate::db::{DbError, ErrorKind};

/// Constraint violations the taxonomy distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation {
    Unique,
    NotNull,
    InvalidDatatype,
    Check,
}

/// Identify a constraint violation, if `err` is one we recognize.
///
/// The driver-neutral kind reported by sqlx is checked first. Raw codes
/// cover what it leaves as `Other`: PostgreSQL SQLSTATEs and SQLite
/// extended result codes (STRICT datatype failures in particular).
pub(crate) fn violation(err: &sqlx::Error) -> Option<Violation> {
    let db_err = err.as_database_error()?;

    match db_err.kind() {
        DriverErrorKind::UniqueViolation => return Some(Violation::Unique),
        DriverErrorKind::NotNullViolation => return Some(Violation::NotNull),
        DriverErrorKind::CheckViolation => return Some(Violation::Check),
        _ => {}
    }

    match db_err.code().as_deref() {
        // unique_violation / SQLITE_CONSTRAINT_UNIQUE / SQLITE_CONSTRAINT_PRIMARYKEY
        Some("23505" | "2067" | "1555") => Some(Violation::Unique),
        // not_null_violation / SQLITE_CONSTRAINT_NOTNULL
        Some("23502" | "1299") => Some(Violation::NotNull),
        // invalid_text_representation / SQLITE_CONSTRAINT_DATATYPE
        Some("22P02" | "3091") => Some(Violation::InvalidDatatype),
        // check_violation / SQLITE_CONSTRAINT_CHECK
        Some("23514" | "275") => Some(Violation::Check),
        _ => None,
    }
}

/// Classify a failed write.
///
/// `action` reads like "creating applicant"; `subject` names what would
/// be duplicated on a uniqueness failure, e.g. "applicant with this email".
pub(crate) fn write_error(err: sqlx::Error, action: &str, subject: &str) -> DbError {
    let classified = match violation(&err) {
        Some(Violation::Unique) => DbError::conflict(format!("{} already exists", subject)),
        Some(Violation::NotNull) => DbError::bad_request("required field is missing"),
        Some(Violation::InvalidDatatype) => DbError::bad_request("invalid data format"),
        Some(Violation::Check) => DbError::bad_request("invalid data"),
        None => DbError::internal(format!("unexpected error while {}: {}", action, err)),
    };
    log_classified(&classified, &err, action);
    classified
}

/// Classify a failed read. Only an explicit "no rows" becomes NotFound.
pub(crate) fn read_error(err: sqlx::Error, action: &str) -> DbError {
    let classified = match &err {
        sqlx::Error::RowNotFound => DbError::not_found(format!("nothing found while {}", action)),
        other => DbError::internal(format!("failed {}: {}", action, other)),
    };
    log_classified(&classified, &err, action);
    classified
}

fn log_classified(classified: &DbError, source: &sqlx::Error, action: &str) {
    match classified.kind() {
        ErrorKind::Internal => error!(error = %source, action, "database operation failed"),
        kind => warn!(error = %source, action, ?kind, "database operation rejected"),
    }
}
