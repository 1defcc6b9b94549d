//! Repository traits for data access abstraction.
//!
//! These traits define the contract the upper service layer programs
//! against. Every call takes the caller's [`RequestContext`] and returns a
//! classified [`DbError`](crate::db::DbError) on failure.

use crate::db::{
    DbResult, RequestContext,
    models::{
        Applicant, ApplicantPatch, Employer, EmployerPatch, Id, NewApplicant, NewEmployer,
        NewNotification, Notification, NotificationPreview,
    },
};

/// Repository for Applicant operations.
pub trait ApplicantRepository {
    /// Insert a new applicant and return the stored row.
    async fn create(&self, ctx: &RequestContext, applicant: &NewApplicant) -> DbResult<Applicant>;

    /// Get an applicant by ID.
    async fn get_by_id(&self, ctx: &RequestContext, id: Id) -> DbResult<Applicant>;

    /// Get an applicant by email.
    async fn get_by_email(&self, ctx: &RequestContext, email: &str) -> DbResult<Applicant>;

    /// Apply the set fields of `patch` to one applicant.
    async fn update(&self, ctx: &RequestContext, id: Id, patch: &ApplicantPatch) -> DbResult<()>;
}

/// Repository for Employer operations.
pub trait EmployerRepository {
    /// Insert a new employer and return the stored row.
    async fn create(&self, ctx: &RequestContext, employer: &NewEmployer) -> DbResult<Employer>;

    /// Get an employer by ID.
    async fn get_by_id(&self, ctx: &RequestContext, id: Id) -> DbResult<Employer>;

    /// Get an employer by email.
    async fn get_by_email(&self, ctx: &RequestContext, email: &str) -> DbResult<Employer>;

    /// Apply the set fields of `patch` to one employer.
    async fn update(&self, ctx: &RequestContext, id: Id, patch: &EmployerPatch) -> DbResult<()>;
}

/// Repository for Notification operations.
pub trait NotificationRepository {
    /// Insert a new, unviewed notification.
    async fn create_notification(
        &self,
        ctx: &RequestContext,
        notification: &NewNotification,
    ) -> DbResult<Notification>;

    /// Get a notification by ID.
    async fn get_notification_by_id(&self, ctx: &RequestContext, id: Id)
    -> DbResult<Notification>;

    /// Preview of a single `apply` notification.
    async fn get_apply_notification_preview(
        &self,
        ctx: &RequestContext,
        id: Id,
    ) -> DbResult<NotificationPreview>;

    /// Preview of a single `download_resume` notification.
    async fn get_download_resume_notification_preview(
        &self,
        ctx: &RequestContext,
        id: Id,
    ) -> DbResult<NotificationPreview>;

    /// All `apply` notifications received by a user, newest first.
    async fn get_apply_notifications_for_user(
        &self,
        ctx: &RequestContext,
        user_id: Id,
    ) -> DbResult<Vec<NotificationPreview>>;

    /// All `download_resume` notifications received by a user, newest first.
    async fn get_download_resume_notifications_for_user(
        &self,
        ctx: &RequestContext,
        user_id: Id,
    ) -> DbResult<Vec<NotificationPreview>>;

    /// Mark one notification as viewed.
    async fn read_notification(&self, ctx: &RequestContext, id: Id) -> DbResult<()>;

    /// Mark every notification in the role's inbox as viewed.
    ///
    /// `role` must be `"applicant"` or `"employer"`.
    async fn read_all_notifications(
        &self,
        ctx: &RequestContext,
        user_id: Id,
        role: &str,
    ) -> DbResult<()>;

    /// Delete every notification in the role's inbox.
    ///
    /// `role` must be `"applicant"` or `"employer"`.
    async fn delete_all_notifications(
        &self,
        ctx: &RequestContext,
        user_id: Id,
        role: &str,
    ) -> DbResult<()>;
}

/// Combined database interface.
///
/// Provides access to repositories via associated types, avoiding dynamic dispatch.
pub trait Database: Send + Sync {
    type Applicants<'a>: ApplicantRepository
    where
        Self: 'a;
    type Employers<'a>: EmployerRepository
    where
        Self: 'a;
    type Notifications<'a>: NotificationRepository
    where
        Self: 'a;

    /// Apply the bundled schema migrations.
    async fn migrate(&self) -> DbResult<()>;

    /// Get the applicant repository.
    fn applicants(&self) -> Self::Applicants<'_>;

    /// Get the employer repository.
    fn employers(&self) -> Self::Employers<'_>;

    /// Get the notification repository.
    fn notifications(&self) -> Self::Notifications<'_>;
}
