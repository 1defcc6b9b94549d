//! Data-access layer for the job board.
//!
//! Trait-based stores for applicants, employers and notifications, with a
//! SQLite implementation underneath. Business logic depends on the traits
//! and on the four-way [`DbError`] taxonomy, never on the driver.
//!
//! # Architecture
//!
//! - `error`: Storage-agnostic error taxonomy
//! - `models`: Domain entities, creation inputs and typed patches
//! - `repository`: Trait definitions for data access
//! - `request`: Request id and deadline carried into every call
//! - `sqlite`: sqlx-backed implementation

mod error;
mod models;
mod repository;
mod request;
pub mod sqlite;

#[cfg(test)]
mod error_test;

pub use error::{DbError, DbResult, ErrorKind};
pub use models::*;
pub use repository::*;
pub use request::{RequestContext, generate_request_id};
pub use sqlite::{
    SqliteApplicantRepository, SqliteDatabase, SqliteEmployerRepository,
    SqliteNotificationRepository,
};
