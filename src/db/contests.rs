use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::*;
use uuid::Uuid;

use crate::auth::authorization::{require_role, verify_contest_owner};
use crate::db::profiles;
use crate::error::AppError;
use crate::models::contests::{self, ContestStatus, CreateContest, UpdateContest};
use crate::models::users::{Actor, Roles};

/// Featured listings never show more than this many contests.
const FEATURED_LIMIT: u64 = 6;

/// Insert a new contest for the calling brand (starts `upcoming`).
pub async fn insert_contest(
    db: &DatabaseConnection,
    actor: &Actor,
    input: CreateContest,
) -> Result<contests::Model, AppError> {
    require_role(actor, Roles::Brand)?;
    let now = Utc::now();
    input.validate(now)?;

    let txn = db.begin().await?;

    let new_contest = contests::ActiveModel {
        id: Set(Uuid::new_v4()),
        brand_id: Set(actor.id),
        title: Set(input.title),
        description: Set(input.description),
        brief: Set(input.brief),
        inspiration: Set(input.inspiration),
        rules: Set(input.rules),
        prize: Set(input.prize),
        deadline: Set(input.deadline),
        status: Set(ContestStatus::Upcoming),
        region: Set(input.region),
        language: Set(input.language.unwrap_or_else(|| "English".to_string())),
        max_entries: Set(input.max_entries),
        is_featured: Set(input.is_featured),
        view_count: Set(0),
        thumbnail_url: Set(input.thumbnail_url),
        winner_submission_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let contest = new_contest.insert(&txn).await?;
    profiles::record_contest_created(&txn, actor.id, contest.prize).await?;

    txn.commit().await?;

    tracing::info!(contest_id = %contest.id, brand_id = %actor.id, "Contest created");
    Ok(contest)
}

pub async fn get_contest<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<contests::Model, AppError> {
    contests::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Contest", id))
}

/// All contests, newest first.
pub async fn list_contests(
    db: &DatabaseConnection,
    page: u64,
    limit: u64,
) -> Result<(Vec<contests::Model>, u64), DbErr> {
    let paginator = contests::Entity::find()
        .order_by_desc(contests::Column::CreatedAt)
        .paginate(db, limit);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page.saturating_sub(1)).await?;
    Ok((items, total))
}

/// Contests currently accepting work, closest deadline first.
pub async fn list_active(db: &DatabaseConnection) -> Result<Vec<contests::Model>, DbErr> {
    contests::Entity::find()
        .filter(contests::Column::Status.eq(ContestStatus::Live))
        .order_by_asc(contests::Column::Deadline)
        .all(db)
        .await
}

pub async fn list_featured(db: &DatabaseConnection) -> Result<Vec<contests::Model>, DbErr> {
    contests::Entity::find()
        .filter(contests::Column::IsFeatured.eq(true))
        .filter(contests::Column::Status.is_in([ContestStatus::Upcoming, ContestStatus::Live]))
        .order_by_desc(contests::Column::CreatedAt)
        .limit(FEATURED_LIMIT)
        .all(db)
        .await
}

/// Case-insensitive match on title or description among open contests.
pub async fn search(db: &DatabaseConnection, q: &str) -> Result<Vec<contests::Model>, DbErr> {
    let pattern = format!("%{}%", q.trim().to_lowercase());
    contests::Entity::find()
        .filter(contests::Column::Status.is_in([ContestStatus::Upcoming, ContestStatus::Live]))
        .filter(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(contests::Column::Title))).like(&pattern))
                .add(
                    Expr::expr(Func::lower(Expr::col(contests::Column::Description)))
                        .like(&pattern),
                ),
        )
        .order_by_desc(contests::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn list_for_brand(
    db: &DatabaseConnection,
    brand_id: Uuid,
) -> Result<Vec<contests::Model>, DbErr> {
    contests::Entity::find()
        .filter(contests::Column::BrandId.eq(brand_id))
        .order_by_desc(contests::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn increment_view_count(db: &DatabaseConnection, id: Uuid) -> Result<(), DbErr> {
    contests::Entity::update_many()
        .col_expr(
            contests::Column::ViewCount,
            Expr::col(contests::Column::ViewCount).add(1),
        )
        .filter(contests::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(())
}

pub async fn update_contest(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
    input: UpdateContest,
) -> Result<contests::Model, AppError> {
    let contest = verify_contest_owner(db, id, actor).await?;
    if contest.status == ContestStatus::Completed {
        return Err(AppError::ContestCompleted);
    }
    input.validate()?;

    let mut active: contests::ActiveModel = contest.into();
    if let Some(v) = input.title {
        active.title = Set(v);
    }
    if let Some(v) = input.description {
        active.description = Set(v);
    }
    if let Some(v) = input.brief {
        active.brief = Set(v);
    }
    if let Some(v) = input.inspiration {
        active.inspiration = Set(v);
    }
    if let Some(v) = input.rules {
        active.rules = Set(v);
    }
    if let Some(v) = input.prize {
        active.prize = Set(v);
    }
    if let Some(v) = input.deadline {
        active.deadline = Set(v);
    }
    if let Some(v) = input.region {
        active.region = Set(v);
    }
    if let Some(v) = input.language {
        active.language = Set(v);
    }
    if let Some(v) = input.max_entries {
        active.max_entries = Set(Some(v));
    }
    if let Some(v) = input.is_featured {
        active.is_featured = Set(v);
    }
    if let Some(v) = input.thumbnail_url {
        active.thumbnail_url = Set(Some(v));
    }
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}

/// Move a contest to `status`. The flag is `true` only when this call took
/// the contest live.
pub async fn set_status(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
    status: ContestStatus,
) -> Result<(contests::Model, bool), AppError> {
    let contest = verify_contest_owner(db, id, actor).await?;
    if contest.status == status {
        return Ok((contest, false));
    }
    if contest.status == ContestStatus::Completed {
        return Err(AppError::ContestCompleted);
    }
    // Completion only happens through winner selection.
    if status == ContestStatus::Completed {
        return Err(AppError::InvalidTransition {
            from: contest.status.as_str().to_string(),
            to: status.as_str().to_string(),
        });
    }

    let mut active: contests::ActiveModel = contest.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now());
    let contest = active.update(db).await?;

    tracing::info!(contest_id = %id, status = status.as_str(), "Contest status changed");
    Ok((contest, status == ContestStatus::Live))
}

pub async fn delete_contest(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
) -> Result<(), AppError> {
    verify_contest_owner(db, id, actor).await?;
    contests::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
