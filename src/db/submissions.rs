use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::auth::authorization::{require_role, verify_contest_owner};
use crate::db::{applications, contests, profiles, videos};
use crate::error::{AppError, is_unique_violation};
use crate::models::contests::ContestStatus;
use crate::models::submissions::{
    self, CreateSubmission, ReviewSubmission, SubmissionStatus, check_submission_gate,
};
use crate::models::users::{Actor, Roles};

/// Result of a winner selection: the winning entry and everyone else who
/// had a live entry in the contest.
#[derive(Debug, Clone)]
pub struct WinnerSelection {
    pub contest_id: Uuid,
    pub contest_title: String,
    pub winner: submissions::Model,
    pub other_creator_ids: Vec<Uuid>,
}

pub async fn get_submission<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<submissions::Model, AppError> {
    submissions::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Submission", id))
}

/// Submit work to a contest.
///
/// The gate runs inside the transaction that inserts the row; the unique
/// index on (contest, creator) catches any duplicate that slips past it.
/// The companion video record is written after commit and only logged on
/// failure.
pub async fn create_submission(
    db: &DatabaseConnection,
    actor: &Actor,
    contest_id: Uuid,
    input: CreateSubmission,
) -> Result<submissions::Model, AppError> {
    // Role first, so non-creators never learn whether the contest exists.
    require_role(actor, Roles::Creator)?;

    let txn = db.begin().await?;

    let contest = contests::get_contest(&txn, contest_id).await?;
    let application = applications::find_for_creator(&txn, contest_id, actor.id).await?;
    let already_submitted = find_for_creator(&txn, contest_id, actor.id)
        .await?
        .is_some();

    check_submission_gate(
        actor.role,
        application.map(|a| a.status),
        contest.status,
        already_submitted,
        input.terms_accepted,
    )?;
    // Payload problems only surface once the caller may submit at all.
    if input.title.trim().is_empty() || input.video_url.trim().is_empty() {
        return Err(AppError::validation("Title and video_url are required"));
    }

    let now = Utc::now();
    let new_submission = submissions::ActiveModel {
        id: Set(Uuid::new_v4()),
        contest_id: Set(contest_id),
        creator_id: Set(actor.id),
        title: Set(input.title),
        description: Set(input.description),
        video_url: Set(input.video_url),
        thumbnail_url: Set(input.thumbnail_url),
        status: Set(SubmissionStatus::PendingApproval),
        feedback: Set(String::new()),
        tags: Set(serde_json::json!(input.tags)),
        view_count: Set(0),
        terms_accepted: Set(true),
        terms_accepted_at: Set(Some(now)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let submission = new_submission.insert(&txn).await.map_err(|e| {
        if is_unique_violation(&e) {
            AppError::DuplicateSubmission
        } else {
            e.into()
        }
    })?;
    profiles::record_participation(&txn, actor.id).await?;

    txn.commit().await?;

    tracing::info!(
        submission_id = %submission.id,
        contest_id = %contest_id,
        creator_id = %actor.id,
        "Submission created"
    );

    if let Err(e) = videos::create_for_submission(db, &submission).await {
        tracing::warn!(
            submission_id = %submission.id,
            "Failed to create video record for submission: {e}"
        );
    }

    Ok(submission)
}

/// Contest owner approves or rejects an entry, with feedback.
pub async fn review_submission(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
    input: ReviewSubmission,
) -> Result<submissions::Model, AppError> {
    input.validate()?;
    let submission = get_submission(db, id).await?;
    let contest = verify_contest_owner(db, submission.contest_id, actor).await?;
    if contest.status == ContestStatus::Completed {
        return Err(AppError::ContestCompleted);
    }

    let mut active: submissions::ActiveModel = submission.into();
    active.status = Set(input.status);
    active.feedback = Set(input.feedback);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

/// Pick the winning entry and close out the contest in one transaction.
pub async fn select_winner(
    db: &DatabaseConnection,
    actor: &Actor,
    contest_id: Uuid,
    submission_id: Uuid,
) -> Result<WinnerSelection, AppError> {
    let txn = db.begin().await?;

    let contest = verify_contest_owner(&txn, contest_id, actor).await?;
    if contest.status == ContestStatus::Completed {
        return Err(AppError::ContestCompleted);
    }

    let winner = get_submission(&txn, submission_id).await?;
    if winner.contest_id != contest_id {
        return Err(AppError::validation(
            "Submission does not belong to this contest",
        ));
    }
    if winner.status == SubmissionStatus::Rejected {
        return Err(AppError::InvalidTransition {
            from: "rejected".to_string(),
            to: "won".to_string(),
        });
    }

    let now = Utc::now();

    let others = submissions::Entity::find()
        .filter(submissions::Column::ContestId.eq(contest_id))
        .filter(submissions::Column::Id.ne(submission_id))
        .filter(submissions::Column::Status.ne(SubmissionStatus::Rejected))
        .all(&txn)
        .await?;

    submissions::Entity::update_many()
        .col_expr(
            submissions::Column::Status,
            Expr::value(SubmissionStatus::NotSelected),
        )
        .col_expr(submissions::Column::UpdatedAt, Expr::value(now))
        .filter(submissions::Column::ContestId.eq(contest_id))
        .filter(submissions::Column::Id.ne(submission_id))
        .filter(submissions::Column::Status.ne(SubmissionStatus::Rejected))
        .exec(&txn)
        .await?;

    let mut active: submissions::ActiveModel = winner.into();
    active.status = Set(SubmissionStatus::Won);
    active.updated_at = Set(now);
    let winner = active.update(&txn).await?;

    let contest_title = contest.title.clone();
    let prize = contest.prize;
    let mut active: crate::models::contests::ActiveModel = contest.into();
    active.status = Set(ContestStatus::Completed);
    active.winner_submission_id = Set(Some(winner.id));
    active.updated_at = Set(now);
    active.update(&txn).await?;

    profiles::record_win(&txn, winner.creator_id, prize).await?;

    txn.commit().await?;

    tracing::info!(
        contest_id = %contest_id,
        submission_id = %winner.id,
        creator_id = %winner.creator_id,
        "Winner selected"
    );

    Ok(WinnerSelection {
        contest_id,
        contest_title,
        winner,
        other_creator_ids: others.into_iter().map(|s| s.creator_id).collect(),
    })
}

pub async fn find_for_creator<C: ConnectionTrait>(
    db: &C,
    contest_id: Uuid,
    creator_id: Uuid,
) -> Result<Option<submissions::Model>, DbErr> {
    submissions::Entity::find()
        .filter(submissions::Column::ContestId.eq(contest_id))
        .filter(submissions::Column::CreatorId.eq(creator_id))
        .one(db)
        .await
}

/// Every entry to a contest, for its owner.
pub async fn list_for_contest(
    db: &DatabaseConnection,
    actor: &Actor,
    contest_id: Uuid,
) -> Result<Vec<submissions::Model>, AppError> {
    verify_contest_owner(db, contest_id, actor).await?;
    Ok(submissions::Entity::find()
        .filter(submissions::Column::ContestId.eq(contest_id))
        .order_by_desc(submissions::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn list_for_creator(
    db: &DatabaseConnection,
    creator_id: Uuid,
) -> Result<Vec<submissions::Model>, DbErr> {
    submissions::Entity::find()
        .filter(submissions::Column::CreatorId.eq(creator_id))
        .order_by_desc(submissions::Column::CreatedAt)
        .all(db)
        .await
}

/// A creator's entries paired with their contests, newest first.
pub async fn list_for_creator_with_contests(
    db: &DatabaseConnection,
    creator_id: Uuid,
) -> Result<Vec<(submissions::Model, Option<crate::models::contests::Model>)>, DbErr> {
    submissions::Entity::find()
        .filter(submissions::Column::CreatorId.eq(creator_id))
        .find_also_related(crate::models::contests::Entity)
        .order_by_desc(submissions::Column::CreatedAt)
        .all(db)
        .await
}
