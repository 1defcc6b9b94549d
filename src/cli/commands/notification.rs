use clap::ValueEnum;
use serde_json::json;

use crate::cli::commands::to_json;
use crate::cli::error::CliResult;
use crate::db::{Database, Id, NotificationRepository, RequestContext};

/// Which inbox to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InboxKind {
    /// Applications received by an employer
    Apply,
    /// Resume downloads seen by an applicant
    DownloadResume,
}

pub async fn list<D: Database>(
    db: &D,
    ctx: &RequestContext,
    user_id: Id,
    kind: InboxKind,
) -> CliResult<String> {
    let notifications = db.notifications();
    let previews = match kind {
        InboxKind::Apply => notifications.get_apply_notifications_for_user(ctx, user_id).await?,
        InboxKind::DownloadResume => {
            notifications
                .get_download_resume_notifications_for_user(ctx, user_id)
                .await?
        }
    };
    to_json(&previews)
}

pub async fn read<D: Database>(db: &D, ctx: &RequestContext, id: Id) -> CliResult<String> {
    db.notifications().read_notification(ctx, id).await?;
    to_json(&json!({ "id": id, "is_viewed": true }))
}

pub async fn read_all<D: Database>(
    db: &D,
    ctx: &RequestContext,
    user_id: Id,
    role: &str,
) -> CliResult<String> {
    db.notifications()
        .read_all_notifications(ctx, user_id, role)
        .await?;
    to_json(&json!({ "user_id": user_id, "role": role, "status": "read" }))
}

pub async fn clear<D: Database>(
    db: &D,
    ctx: &RequestContext,
    user_id: Id,
    role: &str,
) -> CliResult<String> {
    db.notifications()
        .delete_all_notifications(ctx, user_id, role)
        .await?;
    to_json(&json!({ "user_id": user_id, "role": role, "status": "cleared" }))
}
