use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::notifications::{self, NewNotification};

pub async fn insert_notification(
    db: &DatabaseConnection,
    input: NewNotification,
) -> Result<notifications::Model, DbErr> {
    let (related_kind, related_id) = match input.related {
        Some((kind, id)) => (Some(kind), Some(id)),
        None => (None, None),
    };

    notifications::ActiveModel {
        id: Set(Uuid::new_v4()),
        recipient_id: Set(input.recipient_id),
        notification_type: Set(input.notification_type),
        title: Set(input.title),
        message: Set(input.message),
        is_read: Set(false),
        related_kind: Set(related_kind),
        related_id: Set(related_id),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
}

/// Newest first.
pub async fn list_for_recipient(
    db: &DatabaseConnection,
    recipient_id: Uuid,
    unread_only: bool,
) -> Result<Vec<notifications::Model>, DbErr> {
    let mut select =
        notifications::Entity::find().filter(notifications::Column::RecipientId.eq(recipient_id));
    if unread_only {
        select = select.filter(notifications::Column::IsRead.eq(false));
    }
    select
        .order_by_desc(notifications::Column::CreatedAt)
        .all(db)
        .await
}

/// Mark one of the caller's notifications read. Someone else's id is
/// reported as not found.
pub async fn mark_read(
    db: &DatabaseConnection,
    recipient_id: Uuid,
    id: Uuid,
) -> Result<notifications::Model, AppError> {
    let notification = notifications::Entity::find_by_id(id)
        .filter(notifications::Column::RecipientId.eq(recipient_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Notification", id))?;

    if notification.is_read {
        return Ok(notification);
    }
    let mut active: notifications::ActiveModel = notification.into();
    active.is_read = Set(true);
    Ok(active.update(db).await?)
}

/// Returns how many notifications changed.
pub async fn mark_all_read(db: &DatabaseConnection, recipient_id: Uuid) -> Result<u64, DbErr> {
    let res = notifications::Entity::update_many()
        .col_expr(notifications::Column::IsRead, Expr::value(true))
        .filter(notifications::Column::RecipientId.eq(recipient_id))
        .filter(notifications::Column::IsRead.eq(false))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
