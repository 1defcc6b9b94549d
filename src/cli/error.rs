use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::db::DbError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to encode output: {message}")]
    #[diagnostic(code(jobboard::cli::output))]
    Output { message: String },

    #[error("Invalid arguments: {message}")]
    #[diagnostic(
        code(jobboard::cli::invalid_args),
        help("Run with --help to see the accepted arguments")
    )]
    InvalidArgs { message: String },
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output {
            message: e.to_string(),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
