use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::applications::{self as application_db, ApplicationUpdate, BatchItem};
use crate::db::contests as contest_db;
use crate::error::AppError;
use crate::events::{DomainEvent, EventBus};
use crate::models::applications::{
    self, BatchApplications, CreateApplication, RejectApplication, UpdateApplication,
};

/// POST /api/contests/{id}/apply - creators apply to a live contest.
pub async fn apply(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<CreateApplication>,
) -> Result<HttpResponse, AppError> {
    let application = application_db::create_application(
        db.get_ref(),
        &user.actor(),
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Created().json(application))
}

/// GET /api/contests/{id}/application-status - the caller's own application.
pub async fn application_status(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let application =
        application_db::find_for_creator(db.get_ref(), path.into_inner(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "has_applied": application.is_some(),
        "status": application.as_ref().map(|a| a.status),
        "application": application,
    })))
}

/// GET /api/contests/{id}/applications - contest owner only.
pub async fn get_contest_applications(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let applications =
        application_db::list_for_contest(db.get_ref(), &user.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(applications))
}

/// PUT /api/applications/{id} - owner edits status, notes or product.
pub async fn update_application(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    events: web::Data<EventBus>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateApplication>,
) -> Result<HttpResponse, AppError> {
    let outcome = application_db::update_application(
        db.get_ref(),
        &user.actor(),
        path.into_inner(),
        body.into_inner(),
    )
    .await?;

    match &outcome {
        ApplicationUpdate::Approved(r) if r.newly_approved => {
            publish_decision(db.get_ref(), &events, &r.application).await;
        }
        ApplicationUpdate::Rejected(r) if r.newly_rejected => {
            publish_decision(db.get_ref(), &events, &r.application).await;
        }
        _ => {}
    }
    Ok(HttpResponse::Ok().json(outcome.application()))
}

/// POST /api/applications/{id}/approve - reserves one unit of the bound product.
pub async fn approve(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    events: web::Data<EventBus>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let result =
        application_db::approve_application(db.get_ref(), &user.actor(), path.into_inner())
            .await?;
    if result.newly_approved {
        publish_decision(db.get_ref(), &events, &result.application).await;
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "application": result.application,
        "product": result.product,
    })))
}

/// POST /api/applications/{id}/reject
pub async fn reject(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    events: web::Data<EventBus>,
    path: web::Path<Uuid>,
    body: Option<web::Json<RejectApplication>>,
) -> Result<HttpResponse, AppError> {
    let notes = body.and_then(|b| b.into_inner().notes);
    let result =
        application_db::reject_application(db.get_ref(), &user.actor(), path.into_inner(), notes)
            .await?;
    if result.newly_rejected {
        publish_decision(db.get_ref(), &events, &result.application).await;
    }
    Ok(HttpResponse::Ok().json(result.application))
}

/// POST /api/admin/applications/approve - admin batch approval.
pub async fn batch_approve(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    events: web::Data<EventBus>,
    body: web::Json<BatchApplications>,
) -> Result<HttpResponse, AppError> {
    let results = application_db::batch_approve(db.get_ref(), &user.actor(), &body.ids).await?;
    for item in &results {
        if let Ok(r) = &item.result {
            if r.newly_approved {
                publish_decision(db.get_ref(), &events, &r.application).await;
            }
        }
    }
    Ok(HttpResponse::Ok().json(batch_report(&results)))
}

/// POST /api/admin/applications/reject - admin batch rejection.
pub async fn batch_reject(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    events: web::Data<EventBus>,
    body: web::Json<BatchApplications>,
) -> Result<HttpResponse, AppError> {
    let results = application_db::batch_reject(db.get_ref(), &user.actor(), &body.ids).await?;
    for item in &results {
        if let Ok(r) = &item.result {
            if r.newly_rejected {
                publish_decision(db.get_ref(), &events, &r.application).await;
            }
        }
    }
    Ok(HttpResponse::Ok().json(batch_report(&results)))
}

fn batch_report<T>(results: &[BatchItem<T>]) -> serde_json::Value {
    let succeeded = results.iter().filter(|i| i.result.is_ok()).count();
    let items: Vec<_> = results
        .iter()
        .map(|i| match &i.result {
            Ok(_) => serde_json::json!({ "id": i.id, "ok": true }),
            Err(e) => serde_json::json!({
                "id": i.id,
                "ok": false,
                "kind": e.kind(),
                "error": e.to_string(),
            }),
        })
        .collect();
    serde_json::json!({
        "succeeded": succeeded,
        "failed": results.len() - succeeded,
        "results": items,
    })
}

/// Tell the creator about an approval or rejection. Runs after commit; a
/// failed contest lookup only costs the notification.
async fn publish_decision(
    db: &DatabaseConnection,
    events: &EventBus,
    application: &applications::Model,
) {
    let contest_title = match contest_db::get_contest(db, application.contest_id).await {
        Ok(contest) => contest.title,
        Err(e) => {
            tracing::warn!(application_id = %application.id, "Skipping notification: {e}");
            return;
        }
    };

    let event = match application.status {
        applications::ApplicationStatus::Approved => DomainEvent::ApplicationApproved {
            application_id: application.id,
            contest_id: application.contest_id,
            creator_id: application.creator_id,
            contest_title,
        },
        applications::ApplicationStatus::Rejected => DomainEvent::ApplicationRejected {
            application_id: application.id,
            contest_id: application.contest_id,
            creator_id: application.creator_id,
            contest_title,
        },
        applications::ApplicationStatus::Pending => return,
    };
    events.publish(event);
}
