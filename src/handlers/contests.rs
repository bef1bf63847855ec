use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheConfig, CacheData, keys};
use crate::db::{contests as contest_db, submissions as submission_db};
use crate::error::AppError;
use crate::events::{DomainEvent, EventBus};
use crate::models::PaginationQuery;
use crate::models::contests::{
    ContestSearchQuery, CreateContest, SelectWinner, UpdateContest, UpdateContestStatus,
};

/// GET /api/contests?page=&limit= - all contests, newest first.
pub async fn get_contests(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let (contests, total) =
        contest_db::list_contests(db.get_ref(), query.page(), query.limit()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "contests": contests,
        "total": total,
        "page": query.page(),
        "limit": query.limit(),
    })))
}

/// POST /api/contests - brands only.
pub async fn create_contest(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateContest>,
) -> Result<HttpResponse, AppError> {
    let contest = contest_db::insert_contest(db.get_ref(), &user.actor(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(contest))
}

/// GET /api/contests/active
pub async fn get_active_contests(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(contest_db::list_active(db.get_ref()).await?))
}

/// GET /api/contests/featured
pub async fn get_featured_contests(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(contest_db::list_featured(db.get_ref()).await?))
}

/// GET /api/contests/search?q=
pub async fn search_contests(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<ContestSearchQuery>,
) -> Result<HttpResponse, AppError> {
    let q = query.q.as_deref().unwrap_or_default().trim();
    if q.is_empty() {
        return Err(AppError::validation("Query parameter q is required"));
    }
    Ok(HttpResponse::Ok().json(contest_db::search(db.get_ref(), q).await?))
}

/// GET /api/contests/{id} - counts a view, body served from cache.
pub async fn get_contest(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    config: web::Data<CacheConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let contest = cache
        .get_or_load(&keys::contest(&id.to_string()), config.contest_ttl, || {
            contest_db::get_contest(db.get_ref(), id)
        })
        .await?;

    if let Err(e) = contest_db::increment_view_count(db.get_ref(), id).await {
        tracing::warn!(contest_id = %id, "Failed to record contest view: {e}");
    }
    Ok(HttpResponse::Ok().json(contest))
}

/// PUT /api/contests/{id} - owner only, not once completed.
pub async fn update_contest(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateContest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let contest =
        contest_db::update_contest(db.get_ref(), &user.actor(), id, body.into_inner()).await?;
    cache.invalidate(&keys::contest(&id.to_string())).await;
    Ok(HttpResponse::Ok().json(contest))
}

/// PUT /api/contests/{id}/status - owner or admin. Going live notifies creators.
pub async fn update_status(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    events: web::Data<EventBus>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateContestStatus>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (contest, became_live) =
        contest_db::set_status(db.get_ref(), &user.actor(), id, body.status).await?;
    cache.invalidate(&keys::contest(&id.to_string())).await;

    if became_live {
        events.publish(DomainEvent::ContestLive {
            contest_id: contest.id,
            title: contest.title.clone(),
            prize: contest.prize,
        });
    }
    Ok(HttpResponse::Ok().json(contest))
}

/// DELETE /api/contests/{id} - owner only.
pub async fn delete_contest(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    contest_db::delete_contest(db.get_ref(), &user.actor(), id).await?;
    cache.invalidate(&keys::contest(&id.to_string())).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Contest {id} deleted"),
    })))
}

/// POST /api/contests/{id}/winner - owner or admin picks the winning entry.
pub async fn select_winner(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    events: web::Data<EventBus>,
    path: web::Path<Uuid>,
    body: web::Json<SelectWinner>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let selection =
        submission_db::select_winner(db.get_ref(), &user.actor(), id, body.submission_id).await?;
    cache.invalidate(&keys::contest(&id.to_string())).await;

    let contest = contest_db::get_contest(db.get_ref(), id).await?;
    events.publish(DomainEvent::WinnerChosen {
        contest_id: selection.contest_id,
        contest_title: selection.contest_title.clone(),
        submission_id: selection.winner.id,
        winner_id: selection.winner.creator_id,
        prize: contest.prize,
        other_creator_ids: selection.other_creator_ids.clone(),
    });

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "contest": contest,
        "winner": selection.winner,
    })))
}

/// GET /api/brand/contests - the calling brand's own contests.
pub async fn get_brand_contests(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(contest_db::list_for_brand(db.get_ref(), user.0.id).await?))
}
