pub mod notification;
pub mod user;

use serde::Serialize;

use crate::cli::error::CliResult;
use crate::db::{Database, Id};

/// How a user is looked up: by database id or by email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserKey {
    Id(Id),
    Email(String),
}

impl UserKey {
    /// Build a key from the mutually exclusive `--id` / `--email` flags.
    pub fn from_flags(id: Option<Id>, email: Option<String>) -> Option<Self> {
        match (id, email) {
            (Some(id), None) => Some(UserKey::Id(id)),
            (None, Some(email)) => Some(UserKey::Email(email)),
            _ => None,
        }
    }
}

/// Apply the bundled migrations.
pub async fn migrate<D: Database>(db: &D) -> CliResult<String> {
    db.migrate().await?;
    to_json(&serde_json::json!({ "status": "migrated" }))
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
