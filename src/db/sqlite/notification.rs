//! SQLite NotificationRepository implementation.
//!
//! Inbox reads are fixed LEFT JOIN projections. An `apply` notification is
//! sent by an applicant to the employer owning the vacancy in `object_id`;
//! a `download_resume` notification is sent by an employer and its
//! `object_id` is the downloaded resume, whose owner is the receiver.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, instrument, warn};

use super::classify::{read_error, write_error};
use crate::db::{
    DbError, DbResult, Id, NewNotification, Notification, NotificationPreview,
    NotificationRepository, NotificationType, RequestContext, UserRole,
};

const NOTIFICATION_COLUMNS: &str = "id, type, sender_id, sender_role, receiver_id, \
     receiver_role, object_id, resume_id, is_viewed, created_at";

const APPLY_PREVIEW_SQL: &str = "SELECT n.id, n.type, n.sender_id, n.receiver_id, n.object_id, \
     n.resume_id, n.is_viewed, n.created_at, \
     a.first_name AS applicant_name, e.company_name AS employer_name, v.title AS title \
     FROM notification n \
     LEFT JOIN applicant a ON a.id = n.sender_id \
     LEFT JOIN employer e ON e.id = n.receiver_id \
     LEFT JOIN vacancy v ON v.id = n.object_id";

const DOWNLOAD_RESUME_PREVIEW_SQL: &str = "SELECT n.id, n.type, n.sender_id, n.receiver_id, \
     n.object_id, n.resume_id, n.is_viewed, n.created_at, \
     a.first_name AS applicant_name, e.company_name AS employer_name, r.profession AS title \
     FROM notification n \
     LEFT JOIN resume r ON r.id = n.object_id \
     LEFT JOIN applicant a ON a.id = r.applicant_id \
     LEFT JOIN employer e ON e.id = n.sender_id";

const INBOX_ORDER: &str = "ORDER BY n.created_at DESC, n.id DESC";

#[derive(Debug, FromRow)]
struct NotificationRow {
    id: Id,
    #[sqlx(rename = "type")]
    notification_type: String,
    sender_id: Id,
    sender_role: String,
    receiver_id: Id,
    receiver_role: String,
    object_id: Id,
    resume_id: Option<Id>,
    is_viewed: Option<bool>,
    created_at: Option<DateTime<Utc>>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = DbError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: row.id,
            notification_type: row.notification_type.parse().map_err(DbError::internal)?,
            sender_id: row.sender_id,
            sender_role: row.sender_role.parse().map_err(DbError::internal)?,
            receiver_id: row.receiver_id,
            receiver_role: row.receiver_role.parse().map_err(DbError::internal)?,
            object_id: row.object_id,
            resume_id: row.resume_id.unwrap_or_default(),
            is_viewed: row.is_viewed.unwrap_or_default(),
            created_at: row.created_at.unwrap_or_default(),
        })
    }
}

#[derive(Debug, FromRow)]
struct PreviewRow {
    id: Id,
    #[sqlx(rename = "type")]
    notification_type: String,
    sender_id: Id,
    receiver_id: Id,
    object_id: Id,
    resume_id: Option<Id>,
    is_viewed: Option<bool>,
    created_at: Option<DateTime<Utc>>,
    applicant_name: Option<String>,
    employer_name: Option<String>,
    title: Option<String>,
}

impl TryFrom<PreviewRow> for NotificationPreview {
    type Error = DbError;

    fn try_from(row: PreviewRow) -> Result<Self, Self::Error> {
        Ok(NotificationPreview {
            id: row.id,
            notification_type: row.notification_type.parse().map_err(DbError::internal)?,
            sender_id: row.sender_id,
            receiver_id: row.receiver_id,
            object_id: row.object_id,
            resume_id: row.resume_id.unwrap_or_default(),
            applicant_name: row.applicant_name.unwrap_or_default(),
            employer_name: row.employer_name.unwrap_or_default(),
            title: row.title.unwrap_or_default(),
            is_viewed: row.is_viewed.unwrap_or_default(),
            created_at: row.created_at.unwrap_or_default(),
        })
    }
}

fn preview_sql(notification_type: NotificationType) -> &'static str {
    match notification_type {
        NotificationType::Apply => APPLY_PREVIEW_SQL,
        NotificationType::DownloadResume => DOWNLOAD_RESUME_PREVIEW_SQL,
    }
}

/// Parse a role string before any statement is sent.
fn parse_role(role: &str) -> DbResult<UserRole> {
    role.parse::<UserRole>().map_err(|e| {
        warn!(role, "rejected unknown role");
        DbError::bad_request(e)
    })
}

/// SQLx-backed notification repository.
pub struct SqliteNotificationRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl<'a> SqliteNotificationRepository<'a> {
    async fn preview(
        &self,
        ctx: &RequestContext,
        notification_type: NotificationType,
        id: Id,
    ) -> DbResult<NotificationPreview> {
        let sql = format!("{} WHERE n.id = ? AND n.type = ?", preview_sql(notification_type));

        let row: Option<PreviewRow> = ctx
            .bound(
                sqlx::query_as(&sql)
                    .bind(id)
                    .bind(notification_type.as_str())
                    .fetch_optional(self.pool),
            )
            .await
            .map_err(|e| {
                read_error(
                    e,
                    &format!("getting {} notification preview id={}", notification_type, id),
                )
            })?;

        row.ok_or_else(|| {
            DbError::not_found(format!(
                "{} notification with id={} not found",
                notification_type, id
            ))
        })?
        .try_into()
    }

    async fn inbox(
        &self,
        ctx: &RequestContext,
        notification_type: NotificationType,
        user_id: Id,
    ) -> DbResult<Vec<NotificationPreview>> {
        let sql = format!(
            "{} WHERE n.receiver_id = ? AND n.type = ? {}",
            preview_sql(notification_type),
            INBOX_ORDER
        );

        let rows: Vec<PreviewRow> = ctx
            .bound(
                sqlx::query_as(&sql)
                    .bind(user_id)
                    .bind(notification_type.as_str())
                    .fetch_all(self.pool),
            )
            .await
            .map_err(|e| {
                read_error(
                    e,
                    &format!("listing {} notifications for user={}", notification_type, user_id),
                )
            })?;

        rows.into_iter().map(NotificationPreview::try_from).collect()
    }
}

impl<'a> NotificationRepository for SqliteNotificationRepository<'a> {
    #[instrument(skip_all, fields(
        request_id = %ctx.request_id(),
        notification_type = %notification.notification_type,
        receiver_id = notification.receiver_id
    ))]
    async fn create_notification(
        &self,
        ctx: &RequestContext,
        notification: &NewNotification,
    ) -> DbResult<Notification> {
        let sql = format!(
            "INSERT INTO notification \
             (type, sender_id, sender_role, receiver_id, receiver_role, object_id, resume_id, is_viewed) \
             VALUES (?, ?, ?, ?, ?, ?, ?, 0) RETURNING {}",
            NOTIFICATION_COLUMNS
        );

        let row: NotificationRow = ctx
            .bound(
                sqlx::query_as(&sql)
                    .bind(notification.notification_type.as_str())
                    .bind(notification.sender_id)
                    .bind(notification.sender_role.as_str())
                    .bind(notification.receiver_id)
                    .bind(notification.receiver_role.as_str())
                    .bind(notification.object_id)
                    .bind(notification.resume_id)
                    .fetch_one(self.pool),
            )
            .await
            .map_err(|e| write_error(e, "creating notification", "notification"))?;

        debug!(id = row.id, "notification created");
        row.try_into()
    }

    #[instrument(skip_all, fields(request_id = %ctx.request_id(), id = id))]
    async fn get_notification_by_id(
        &self,
        ctx: &RequestContext,
        id: Id,
    ) -> DbResult<Notification> {
        let sql = format!(
            "SELECT {} FROM notification WHERE id = ?",
            NOTIFICATION_COLUMNS
        );

        let row: Option<NotificationRow> = ctx
            .bound(sqlx::query_as(&sql).bind(id).fetch_optional(self.pool))
            .await
            .map_err(|e| read_error(e, &format!("getting notification by id={}", id)))?;

        row.ok_or_else(|| DbError::not_found(format!("notification with id={} not found", id)))?
            .try_into()
    }

    #[instrument(skip_all, fields(request_id = %ctx.request_id(), id = id))]
    async fn get_apply_notification_preview(
        &self,
        ctx: &RequestContext,
        id: Id,
    ) -> DbResult<NotificationPreview> {
        self.preview(ctx, NotificationType::Apply, id).await
    }

    #[instrument(skip_all, fields(request_id = %ctx.request_id(), id = id))]
    async fn get_download_resume_notification_preview(
        &self,
        ctx: &RequestContext,
        id: Id,
    ) -> DbResult<NotificationPreview> {
        self.preview(ctx, NotificationType::DownloadResume, id).await
    }

    #[instrument(skip_all, fields(request_id = %ctx.request_id(), user_id = user_id))]
    async fn get_apply_notifications_for_user(
        &self,
        ctx: &RequestContext,
        user_id: Id,
    ) -> DbResult<Vec<NotificationPreview>> {
        self.inbox(ctx, NotificationType::Apply, user_id).await
    }

    #[instrument(skip_all, fields(request_id = %ctx.request_id(), user_id = user_id))]
    async fn get_download_resume_notifications_for_user(
        &self,
        ctx: &RequestContext,
        user_id: Id,
    ) -> DbResult<Vec<NotificationPreview>> {
        self.inbox(ctx, NotificationType::DownloadResume, user_id)
            .await
    }

    #[instrument(skip_all, fields(request_id = %ctx.request_id(), id = id))]
    async fn read_notification(&self, ctx: &RequestContext, id: Id) -> DbResult<()> {
        let result = ctx
            .bound(
                sqlx::query("UPDATE notification SET is_viewed = 1 WHERE id = ?")
                    .bind(id)
                    .execute(self.pool),
            )
            .await
            .map_err(|e| {
                write_error(e, &format!("reading notification id={}", id), "notification")
            })?;

        if result.rows_affected() == 0 {
            warn!("notification not found");
            return Err(DbError::not_found(format!(
                "notification with id={} not found",
                id
            )));
        }

        debug!("notification marked as viewed");
        Ok(())
    }

    #[instrument(skip_all, fields(request_id = %ctx.request_id(), user_id = user_id, role = %role))]
    async fn read_all_notifications(
        &self,
        ctx: &RequestContext,
        user_id: Id,
        role: &str,
    ) -> DbResult<()> {
        let inbox = parse_role(role)?.inbox_type();

        let result = ctx
            .bound(
                sqlx::query(
                    "UPDATE notification SET is_viewed = 1 WHERE receiver_id = ? AND type = ?",
                )
                .bind(user_id)
                .bind(inbox.as_str())
                .execute(self.pool),
            )
            .await
            .map_err(|e| {
                write_error(
                    e,
                    &format!("reading all notifications for user={}", user_id),
                    "notification",
                )
            })?;

        debug!(rows = result.rows_affected(), "notifications marked as viewed");
        Ok(())
    }

    #[instrument(skip_all, fields(request_id = %ctx.request_id(), user_id = user_id, role = %role))]
    async fn delete_all_notifications(
        &self,
        ctx: &RequestContext,
        user_id: Id,
        role: &str,
    ) -> DbResult<()> {
        let inbox = parse_role(role)?.inbox_type();

        let result = ctx
            .bound(
                sqlx::query("DELETE FROM notification WHERE receiver_id = ? AND type = ?")
                    .bind(user_id)
                    .bind(inbox.as_str())
                    .execute(self.pool),
            )
            .await
            .map_err(|e| {
                write_error(
                    e,
                    &format!("deleting all notifications for user={}", user_id),
                    "notification",
                )
            })?;

        debug!(rows = result.rows_affected(), "notifications deleted");
        Ok(())
    }
}
