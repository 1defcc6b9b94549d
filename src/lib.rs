//! Job board data-access layer.
//!
//! - [`db`]: repository traits, models, the error taxonomy and the SQLite
//!   implementation
//! - [`config`]: database location and timeout resolution
//! - [`cli`]: the `jobboard-db` command line tool

pub mod cli;
pub mod config;
pub mod db;
