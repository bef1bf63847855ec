use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::*;
use uuid::Uuid;

use crate::auth::authorization::require_admin;
use crate::error::AppError;
use crate::models::submissions;
use crate::models::users::Actor;
use crate::models::videos::{
    self, ApprovalStatus, CreateVideo, ModerateVideo, VideoCategory, VideoQuery,
};

const FEATURED_LIMIT: u64 = 6;

/// The pending video record that mirrors a fresh submission.
pub async fn create_for_submission(
    db: &DatabaseConnection,
    submission: &submissions::Model,
) -> Result<videos::Model, DbErr> {
    let now = Utc::now();
    videos::ActiveModel {
        id: Set(Uuid::new_v4()),
        creator_id: Set(submission.creator_id),
        title: Set(submission.title.clone()),
        description: Set(submission.description.clone()),
        url: Set(submission.video_url.clone()),
        thumbnail_url: Set(submission.thumbnail_url.clone()),
        category: Set(VideoCategory::Other),
        views: Set(0),
        likes: Set(0),
        duration_seconds: Set(None),
        is_featured: Set(false),
        approval_status: Set(ApprovalStatus::Pending),
        approval_date: Set(None),
        approval_notes: Set(String::new()),
        contest_id: Set(Some(submission.contest_id)),
        submission_id: Set(Some(submission.id)),
        is_standalone: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
}

/// A standalone upload by the caller; waits for moderation.
pub async fn insert_video(
    db: &DatabaseConnection,
    actor: &Actor,
    input: CreateVideo,
) -> Result<videos::Model, AppError> {
    input.validate()?;
    let now = Utc::now();
    let video = videos::ActiveModel {
        id: Set(Uuid::new_v4()),
        creator_id: Set(actor.id),
        title: Set(input.title),
        description: Set(input.description),
        url: Set(input.url),
        thumbnail_url: Set(input.thumbnail_url),
        category: Set(input.category.unwrap_or(VideoCategory::Other)),
        views: Set(0),
        likes: Set(0),
        duration_seconds: Set(input.duration_seconds),
        is_featured: Set(false),
        approval_status: Set(ApprovalStatus::Pending),
        approval_date: Set(None),
        approval_notes: Set(String::new()),
        contest_id: Set(None),
        submission_id: Set(None),
        is_standalone: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;
    Ok(video)
}

pub async fn get_video(db: &DatabaseConnection, id: Uuid) -> Result<videos::Model, AppError> {
    videos::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Video", id))
}

/// Filtered listing. Only admins see videos that are not yet approved.
pub async fn list_videos(
    db: &DatabaseConnection,
    actor: &Actor,
    query: &VideoQuery,
) -> Result<Vec<videos::Model>, DbErr> {
    let mut select = videos::Entity::find();
    if !actor.is_admin() {
        select = select.filter(videos::Column::ApprovalStatus.eq(ApprovalStatus::Approved));
    }
    if let Some(creator_id) = query.creator_id {
        select = select.filter(videos::Column::CreatorId.eq(creator_id));
    }
    if let Some(contest_id) = query.contest_id {
        select = select.filter(videos::Column::ContestId.eq(contest_id));
    }
    if let Some(standalone) = query.is_standalone {
        select = select.filter(videos::Column::IsStandalone.eq(standalone));
    }
    select
        .order_by_desc(videos::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn list_for_creator(
    db: &DatabaseConnection,
    creator_id: Uuid,
) -> Result<Vec<videos::Model>, DbErr> {
    videos::Entity::find()
        .filter(videos::Column::CreatorId.eq(creator_id))
        .order_by_desc(videos::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn list_featured(db: &DatabaseConnection) -> Result<Vec<videos::Model>, DbErr> {
    videos::Entity::find()
        .filter(videos::Column::IsFeatured.eq(true))
        .filter(videos::Column::ApprovalStatus.eq(ApprovalStatus::Approved))
        .order_by_desc(videos::Column::CreatedAt)
        .limit(FEATURED_LIMIT)
        .all(db)
        .await
}

pub async fn count_for_creator(db: &DatabaseConnection, creator_id: Uuid) -> Result<u64, DbErr> {
    videos::Entity::find()
        .filter(videos::Column::CreatorId.eq(creator_id))
        .count(db)
        .await
}

pub async fn like(db: &DatabaseConnection, id: Uuid) -> Result<videos::Model, AppError> {
    bump(db, id, videos::Column::Likes).await
}

pub async fn record_view(db: &DatabaseConnection, id: Uuid) -> Result<videos::Model, AppError> {
    bump(db, id, videos::Column::Views).await
}

async fn bump(
    db: &DatabaseConnection,
    id: Uuid,
    column: videos::Column,
) -> Result<videos::Model, AppError> {
    let res = videos::Entity::update_many()
        .col_expr(column, Expr::col(column).add(1))
        .filter(videos::Column::Id.eq(id))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(AppError::not_found("Video", id));
    }
    get_video(db, id).await
}

/// Admin approve/reject of a video.
pub async fn moderate(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
    input: ModerateVideo,
) -> Result<videos::Model, AppError> {
    require_admin(actor)?;
    if input.approval_status == ApprovalStatus::Pending {
        return Err(AppError::validation(
            "Moderation status must be approved or rejected",
        ));
    }

    let video = get_video(db, id).await?;
    let now = Utc::now();
    let mut active: videos::ActiveModel = video.into();
    active.approval_status = Set(input.approval_status);
    active.approval_notes = Set(input.approval_notes);
    active.approval_date = Set(Some(now));
    active.updated_at = Set(now);
    Ok(active.update(db).await?)
}
