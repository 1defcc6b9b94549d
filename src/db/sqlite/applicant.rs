//! SQLite ApplicantRepository implementation.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, instrument};

use super::classify::{read_error, write_error};
use super::helpers::{Assignments, execute_update};
use crate::db::{
    Applicant, ApplicantPatch, ApplicantRepository, ApplicantStatus, DbError, DbResult, Id,
    NewApplicant,
    RequestContext,
};

const SELECT_APPLICANT: &str = "SELECT id, email, password_hashed, password_salt, first_name, \
     last_name, middle_name, city_id, birth_date, sex, status, quote, vk, telegram, facebook, \
     avatar_id, created_at, updated_at FROM applicant";

/// Raw applicant row; nullable columns stay optional until mapped.
#[derive(Debug, FromRow)]
struct ApplicantRow {
    id: Id,
    email: String,
    password_hashed: Vec<u8>,
    password_salt: Vec<u8>,
    first_name: String,
    last_name: String,
    middle_name: Option<String>,
    city_id: Option<Id>,
    birth_date: Option<NaiveDate>,
    sex: Option<String>,
    status: Option<String>,
    quote: Option<String>,
    vk: Option<String>,
    telegram: Option<String>,
    facebook: Option<String>,
    avatar_id: Option<Id>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ApplicantRow> for Applicant {
    type Error = DbError;

    fn try_from(row: ApplicantRow) -> Result<Self, Self::Error> {
        let status = match row.status.as_deref() {
            None | Some("") => ApplicantStatus::default(),
            Some(s) => s.parse::<ApplicantStatus>().map_err(DbError::internal)?,
        };

        Ok(Applicant {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            middle_name: row.middle_name.unwrap_or_default(),
            city_id: row.city_id.unwrap_or_default(),
            birth_date: row.birth_date.unwrap_or_default(),
            sex: row.sex.unwrap_or_default(),
            status,
            quote: row.quote.unwrap_or_default(),
            vk: row.vk.unwrap_or_default(),
            telegram: row.telegram.unwrap_or_default(),
            facebook: row.facebook.unwrap_or_default(),
            avatar_id: row.avatar_id.unwrap_or_default(),
            password_hash: row.password_hashed,
            password_salt: row.password_salt,
            created_at: row.created_at.unwrap_or_default(),
            updated_at: row.updated_at.unwrap_or_default(),
        })
    }
}

fn patch_assignments(patch: &ApplicantPatch) -> Assignments {
    let mut assignments = Assignments::new();
    assignments
        .text("email", &patch.email)
        .text("first_name", &patch.first_name)
        .text("last_name", &patch.last_name)
        .text("middle_name", &patch.middle_name)
        .integer("city_id", patch.city_id)
        .date("birth_date", patch.birth_date)
        .text("sex", &patch.sex)
        .text("status", &patch.status.map(|s| s.as_str().to_string()))
        .text("quote", &patch.quote)
        .text("vk", &patch.vk)
        .text("telegram", &patch.telegram)
        .text("facebook", &patch.facebook)
        .integer("avatar_id", patch.avatar_id)
        .bytes("password_hashed", &patch.password_hash)
        .bytes("password_salt", &patch.password_salt);
    assignments
}

/// SQLx-backed applicant repository.
pub struct SqliteApplicantRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl<'a> ApplicantRepository for SqliteApplicantRepository<'a> {
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), email = %applicant.email))]
    async fn create(&self, ctx: &RequestContext, applicant: &NewApplicant) -> DbResult<Applicant> {
        let row: ApplicantRow = ctx
            .bound(
                sqlx::query_as(
                    "INSERT INTO applicant (email, password_hashed, password_salt, first_name, last_name) \
                     VALUES (?, ?, ?, ?, ?) \
                     RETURNING id, email, password_hashed, password_salt, first_name, last_name, \
                     middle_name, city_id, birth_date, sex, status, quote, vk, telegram, facebook, \
                     avatar_id, created_at, updated_at",
                )
                .bind(&applicant.email)
                .bind(&applicant.password_hash)
                .bind(&applicant.password_salt)
                .bind(&applicant.first_name)
                .bind(&applicant.last_name)
                .fetch_one(self.pool),
            )
            .await
            .map_err(|e| write_error(e, "creating applicant", "applicant with this email"))?;

        debug!(id = row.id, "applicant created");
        row.try_into()
    }

    #[instrument(skip_all, fields(request_id = %ctx.request_id(), id = id))]
    async fn get_by_id(&self, ctx: &RequestContext, id: Id) -> DbResult<Applicant> {
        let row: Option<ApplicantRow> = ctx
            .bound(
                sqlx::query_as(&format!("{} WHERE id = ?", SELECT_APPLICANT))
                    .bind(id)
                    .fetch_optional(self.pool),
            )
            .await
            .map_err(|e| read_error(e, &format!("getting applicant by id={}", id)))?;

        row.ok_or_else(|| DbError::not_found(format!("applicant with id={} not found", id)))?
            .try_into()
    }

    #[instrument(skip_all, fields(request_id = %ctx.request_id(), email = %email))]
    async fn get_by_email(&self, ctx: &RequestContext, email: &str) -> DbResult<Applicant> {
        let row: Option<ApplicantRow> = ctx
            .bound(
                sqlx::query_as(&format!("{} WHERE email = ?", SELECT_APPLICANT))
                    .bind(email)
                    .fetch_optional(self.pool),
            )
            .await
            .map_err(|e| read_error(e, &format!("getting applicant by email={}", email)))?;

        row.ok_or_else(|| DbError::not_found(format!("applicant with email={} not found", email)))?
            .try_into()
    }

    #[instrument(skip_all, fields(request_id = %ctx.request_id(), id = id))]
    async fn update(&self, ctx: &RequestContext, id: Id, patch: &ApplicantPatch) -> DbResult<()> {
        execute_update(
            self.pool,
            ctx,
            "applicant",
            "applicant",
            id,
            patch_assignments(patch),
        )
        .await?;

        debug!("applicant updated");
        Ok(())
    }
}
