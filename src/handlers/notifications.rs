use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::require_admin;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::notifications as notification_db;
use crate::error::AppError;
use crate::models::notifications::{BroadcastNotification, NewNotification};
use crate::notify::NotificationDispatcher;

/// GET /api/notifications - the caller's notifications, newest first.
pub async fn get_notifications(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let notifications = notification_db::list_for_recipient(db.get_ref(), user.0.id, false).await?;
    Ok(HttpResponse::Ok().json(notifications))
}

/// GET /api/notifications/unread
pub async fn get_unread(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let notifications = notification_db::list_for_recipient(db.get_ref(), user.0.id, true).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "count": notifications.len(),
        "notifications": notifications,
    })))
}

/// POST /api/notifications/{id}/read
pub async fn mark_read(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let notification =
        notification_db::mark_read(db.get_ref(), user.0.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(notification))
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let updated = notification_db::mark_all_read(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "updated": updated })))
}

/// POST /api/notifications/broadcast - admin only. One notification per
/// active user of the given role.
pub async fn broadcast(
    user: AuthenticatedUser,
    dispatcher: web::Data<NotificationDispatcher>,
    body: web::Json<BroadcastNotification>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user.actor())?;
    let input = body.into_inner();
    if input.title.trim().is_empty() || input.message.trim().is_empty() {
        return Err(AppError::validation("Title and message are required"));
    }

    let template = NewNotification {
        recipient_id: Uuid::nil(),
        notification_type: input.notification_type,
        title: input.title,
        message: input.message,
        related: None,
    };
    let sent = dispatcher.broadcast(input.recipient_role, template).await?;
    tracing::info!(
        role = input.recipient_role.as_str(),
        sent,
        "Broadcast notification sent"
    );
    Ok(HttpResponse::Ok().json(serde_json::json!({ "sent": sent })))
}
