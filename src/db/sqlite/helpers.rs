//! Shared helper functions for SQLite repositories.

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::classify::write_error;
use crate::db::{DbError, DbResult, Id, RequestContext};

/// SQL expression for "now" in the format the schema defaults use.
pub const NOW_SQL: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

/// A value bound into a SET assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchValue {
    Text(String),
    Integer(i64),
    Date(NaiveDate),
    Bytes(Vec<u8>),
}

/// Ordered column assignments for an UPDATE.
///
/// Column names are compile-time constants chosen by the repository, never
/// caller input; only values are bound as parameters.
#[derive(Debug, Default)]
pub struct Assignments {
    columns: Vec<(&'static str, PatchValue)>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, column: &'static str, value: &Option<String>) -> &mut Self {
        if let Some(v) = value {
            self.columns.push((column, PatchValue::Text(v.clone())));
        }
        self
    }

    pub fn integer(&mut self, column: &'static str, value: Option<i64>) -> &mut Self {
        if let Some(v) = value {
            self.columns.push((column, PatchValue::Integer(v)));
        }
        self
    }

    pub fn date(&mut self, column: &'static str, value: Option<NaiveDate>) -> &mut Self {
        if let Some(v) = value {
            self.columns.push((column, PatchValue::Date(v)));
        }
        self
    }

    pub fn bytes(&mut self, column: &'static str, value: &Option<Vec<u8>>) -> &mut Self {
        if let Some(v) = value {
            self.columns.push((column, PatchValue::Bytes(v.clone())));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|(column, _)| *column)
    }
}

/// Build `UPDATE <table> SET a = ?, b = ?, updated_at = <now> WHERE id = ?`.
///
/// Assignments keep the order they were added in, so the statement text is
/// deterministic for a given patch.
pub fn build_update(
    table: &'static str,
    id: Id,
    assignments: Assignments,
) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new(format!("UPDATE {} SET ", table));

    {
        let mut set = builder.separated(", ");
        for (column, value) in assignments.columns {
            set.push(format!("{} = ", column));
            match value {
                PatchValue::Text(v) => set.push_bind_unseparated(v),
                PatchValue::Integer(v) => set.push_bind_unseparated(v),
                PatchValue::Date(v) => set.push_bind_unseparated(v),
                PatchValue::Bytes(v) => set.push_bind_unseparated(v),
            };
        }
        set.push(format!("updated_at = {}", NOW_SQL));
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder
}

/// Run a partial update that must touch exactly one row.
///
/// An empty patch is rejected before anything is sent. Zero affected rows
/// is reported as Internal, not NotFound.
pub async fn execute_update(
    pool: &SqlitePool,
    ctx: &RequestContext,
    entity: &str,
    table: &'static str,
    id: Id,
    assignments: Assignments,
) -> DbResult<()> {
    if assignments.is_empty() {
        return Err(DbError::bad_request("no fields to update"));
    }

    tracing::debug!(
        columns = ?assignments.columns().collect::<Vec<_>>(),
        "updating {}",
        entity
    );

    let mut builder = build_update(table, id, assignments);
    let result = ctx
        .bound(builder.build().execute(pool))
        .await
        .map_err(|e| {
            write_error(
                e,
                &format!("updating {} with id={}", entity, id),
                &format!("{} with these values", entity),
            )
        })?;

    if result.rows_affected() == 0 {
        tracing::error!(id, entity, "no rows affected by update");
        return Err(DbError::internal(format!(
            "{} with id={} not found while updating",
            entity, id
        )));
    }

    Ok(())
}
