use crate::cli::commands::{UserKey, to_json};
use crate::cli::error::CliResult;
use crate::db::{ApplicantRepository, Database, EmployerRepository, RequestContext};

pub async fn show_applicant<D: Database>(
    db: &D,
    ctx: &RequestContext,
    key: &UserKey,
) -> CliResult<String> {
    let applicants = db.applicants();
    let applicant = match key {
        UserKey::Id(id) => applicants.get_by_id(ctx, *id).await?,
        UserKey::Email(email) => applicants.get_by_email(ctx, email).await?,
    };
    to_json(&applicant)
}

pub async fn show_employer<D: Database>(
    db: &D,
    ctx: &RequestContext,
    key: &UserKey,
) -> CliResult<String> {
    let employers = db.employers();
    let employer = match key {
        UserKey::Id(id) => employers.get_by_id(ctx, *id).await?,
        UserKey::Email(email) => employers.get_by_email(ctx, email).await?,
    };
    to_json(&employer)
}
