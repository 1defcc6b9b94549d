//! SQLite implementation of the database traits.
//!
//! This module provides a SQLite-backed implementation of the repository
//! traits defined in the parent module, on top of an sqlx connection pool.

mod applicant;
mod classify;
mod connection;
mod employer;
mod helpers;
mod notification;

#[cfg(test)]
mod notification_test;

pub use applicant::SqliteApplicantRepository;
pub use connection::SqliteDatabase;
pub use employer::SqliteEmployerRepository;
pub use notification::SqliteNotificationRepository;
