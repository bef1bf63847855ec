use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::{contests as contest_db, submissions as submission_db};
use crate::error::AppError;
use crate::events::{DomainEvent, EventBus};
use crate::models::submissions::{CreateSubmission, ReviewSubmission};

/// POST /api/contests/{id}/submit - approved creators enter a live contest.
pub async fn submit(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    events: web::Data<EventBus>,
    path: web::Path<Uuid>,
    body: web::Json<CreateSubmission>,
) -> Result<HttpResponse, AppError> {
    let contest_id = path.into_inner();
    let submission = submission_db::create_submission(
        db.get_ref(),
        &user.actor(),
        contest_id,
        body.into_inner(),
    )
    .await?;

    match contest_db::get_contest(db.get_ref(), contest_id).await {
        Ok(contest) => events.publish(DomainEvent::SubmissionCreated {
            submission_id: submission.id,
            contest_id,
            brand_id: contest.brand_id,
            contest_title: contest.title,
            creator_name: user.0.name_or_email(),
        }),
        Err(e) => tracing::warn!(submission_id = %submission.id, "Skipping brand notification: {e}"),
    }

    Ok(HttpResponse::Created().json(submission))
}

/// GET /api/contests/{id}/submissions - contest owner only.
pub async fn get_contest_submissions(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let submissions =
        submission_db::list_for_contest(db.get_ref(), &user.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(submissions))
}

/// PUT /api/submissions/{id}/review - approve or reject with feedback.
pub async fn review_submission(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    events: web::Data<EventBus>,
    path: web::Path<Uuid>,
    body: web::Json<ReviewSubmission>,
) -> Result<HttpResponse, AppError> {
    let submission = submission_db::review_submission(
        db.get_ref(),
        &user.actor(),
        path.into_inner(),
        body.into_inner(),
    )
    .await?;

    match contest_db::get_contest(db.get_ref(), submission.contest_id).await {
        Ok(contest) => events.publish(DomainEvent::SubmissionFeedback {
            submission_id: submission.id,
            creator_id: submission.creator_id,
            contest_title: contest.title,
            status: submission.status,
        }),
        Err(e) => tracing::warn!(submission_id = %submission.id, "Skipping feedback notification: {e}"),
    }

    Ok(HttpResponse::Ok().json(submission))
}
