//! SQLite EmployerRepository implementation.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, instrument};

use super::classify::{read_error, write_error};
use super::helpers::{Assignments, execute_update};
use crate::db::{
    DbError, DbResult, Employer, EmployerPatch, EmployerRepository, Id, NewEmployer,
    RequestContext,
};

const EMPLOYER_COLUMNS: &str = "id, email, password_hashed, password_salt, company_name, \
     legal_address, slogan, website, description, vk, telegram, facebook, logo_id, \
     created_at, updated_at";

#[derive(Debug, FromRow)]
struct EmployerRow {
    id: Id,
    email: String,
    password_hashed: Vec<u8>,
    password_salt: Vec<u8>,
    company_name: String,
    legal_address: Option<String>,
    slogan: Option<String>,
    website: Option<String>,
    description: Option<String>,
    vk: Option<String>,
    telegram: Option<String>,
    facebook: Option<String>,
    logo_id: Option<Id>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<EmployerRow> for Employer {
    fn from(row: EmployerRow) -> Self {
        Employer {
            id: row.id,
            email: row.email,
            company_name: row.company_name,
            legal_address: row.legal_address.unwrap_or_default(),
            slogan: row.slogan.unwrap_or_default(),
            website: row.website.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            vk: row.vk.unwrap_or_default(),
            telegram: row.telegram.unwrap_or_default(),
            facebook: row.facebook.unwrap_or_default(),
            logo_id: row.logo_id.unwrap_or_default(),
            password_hash: row.password_hashed,
            password_salt: row.password_salt,
            created_at: row.created_at.unwrap_or_default(),
            updated_at: row.updated_at.unwrap_or_default(),
        }
    }
}

fn patch_assignments(patch: &EmployerPatch) -> Assignments {
    let mut assignments = Assignments::new();
    assignments
        .text("email", &patch.email)
        .text("company_name", &patch.company_name)
        .text("legal_address", &patch.legal_address)
        .text("slogan", &patch.slogan)
        .text("website", &patch.website)
        .text("description", &patch.description)
        .text("vk", &patch.vk)
        .text("telegram", &patch.telegram)
        .text("facebook", &patch.facebook)
        .integer("logo_id", patch.logo_id)
        .bytes("password_hashed", &patch.password_hash)
        .bytes("password_salt", &patch.password_salt);
    assignments
}

/// SQLx-backed employer repository.
pub struct SqliteEmployerRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl<'a> EmployerRepository for SqliteEmployerRepository<'a> {
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), email = %employer.email))]
    async fn create(&self, ctx: &RequestContext, employer: &NewEmployer) -> DbResult<Employer> {
        let sql = format!(
            "INSERT INTO employer (email, password_hashed, password_salt, company_name, legal_address) \
             VALUES (?, ?, ?, ?, ?) RETURNING {}",
            EMPLOYER_COLUMNS
        );

        let row: EmployerRow = ctx
            .bound(
                sqlx::query_as(&sql)
                    .bind(&employer.email)
                    .bind(&employer.password_hash)
                    .bind(&employer.password_salt)
                    .bind(&employer.company_name)
                    .bind(&employer.legal_address)
                    .fetch_one(self.pool),
            )
            .await
            .map_err(|e| write_error(e, "creating employer", "employer with this email"))?;

        debug!(id = row.id, "employer created");
        Ok(row.into())
    }

    #[instrument(skip_all, fields(request_id = %ctx.request_id(), id = id))]
    async fn get_by_id(&self, ctx: &RequestContext, id: Id) -> DbResult<Employer> {
        let sql = format!("SELECT {} FROM employer WHERE id = ?", EMPLOYER_COLUMNS);

        let row: Option<EmployerRow> = ctx
            .bound(sqlx::query_as(&sql).bind(id).fetch_optional(self.pool))
            .await
            .map_err(|e| read_error(e, &format!("getting employer by id={}", id)))?;

        row.map(Employer::from)
            .ok_or_else(|| DbError::not_found(format!("employer with id={} not found", id)))
    }

    #[instrument(skip_all, fields(request_id = %ctx.request_id(), email = %email))]
    async fn get_by_email(&self, ctx: &RequestContext, email: &str) -> DbResult<Employer> {
        let sql = format!("SELECT {} FROM employer WHERE email = ?", EMPLOYER_COLUMNS);

        let row: Option<EmployerRow> = ctx
            .bound(sqlx::query_as(&sql).bind(email).fetch_optional(self.pool))
            .await
            .map_err(|e| read_error(e, &format!("getting employer by email={}", email)))?;

        row.map(Employer::from).ok_or_else(|| {
            DbError::not_found(format!("employer with email={} not found", email))
        })
    }

    #[instrument(skip_all, fields(request_id = %ctx.request_id(), id = id))]
    async fn update(&self, ctx: &RequestContext, id: Id, patch: &EmployerPatch) -> DbResult<()> {
        execute_update(
            self.pool,
            ctx,
            "employer",
            "employer",
            id,
            patch_assignments(patch),
        )
        .await?;

        debug!("employer updated");
        Ok(())
    }
}
