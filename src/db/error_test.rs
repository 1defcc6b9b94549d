//! Tests for database error types.

use crate::db::{DbError, DbResult, ErrorKind};

#[test]
fn conflict_error_displays_correctly() {
    let err = DbError::conflict("applicant with this email already exists");
    assert_eq!(
        err.to_string(),
        "Conflict: applicant with this email already exists"
    );
}

#[test]
fn bad_request_error_displays_correctly() {
    let err = DbError::bad_request("required field is missing");
    assert_eq!(err.to_string(), "Bad request: required field is missing");
}

#[test]
fn not_found_error_displays_correctly() {
    let err = DbError::not_found("applicant with id=5 not found");
    assert_eq!(err.to_string(), "Not found: applicant with id=5 not found");
}

#[test]
fn internal_error_displays_correctly() {
    let err = DbError::internal("employer with id=1 not found while updating");
    assert_eq!(
        err.to_string(),
        "Internal error: employer with id=1 not found while updating"
    );
}

#[test]
fn kind_matches_variant() {
    assert_eq!(DbError::conflict("x").kind(), ErrorKind::Conflict);
    assert_eq!(DbError::bad_request("x").kind(), ErrorKind::BadRequest);
    assert_eq!(DbError::not_found("x").kind(), ErrorKind::NotFound);
    assert_eq!(DbError::internal("x").kind(), ErrorKind::Internal);
}

#[test]
fn message_strips_category_prefix() {
    let err = DbError::bad_request("invalid data");
    assert_eq!(err.message(), "invalid data");
}

#[test]
fn db_result_err_returns_error() {
    let result: DbResult<i64> = Err(DbError::not_found("notification not found"));
    assert!(matches!(result, Err(DbError::NotFound { .. })));
}
