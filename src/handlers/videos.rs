use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::videos as video_db;
use crate::error::AppError;
use crate::models::videos::{ApprovalStatus, CreateVideo, ModerateVideo, VideoQuery};

/// GET /api/videos?creator_id=&contest_id=&is_standalone=
pub async fn get_videos(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<VideoQuery>,
) -> Result<HttpResponse, AppError> {
    let videos = video_db::list_videos(db.get_ref(), &user.actor(), &query).await?;
    Ok(HttpResponse::Ok().json(videos))
}

/// POST /api/videos - standalone upload, pending moderation.
pub async fn create_video(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateVideo>,
) -> Result<HttpResponse, AppError> {
    let video = video_db::insert_video(db.get_ref(), &user.actor(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(video))
}

/// GET /api/videos/featured
pub async fn get_featured(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(video_db::list_featured(db.get_ref()).await?))
}

/// GET /api/videos/creator/{creator_id} - everything for the creator
/// themselves, approved videos for anyone else.
pub async fn get_creator_videos(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let creator_id = path.into_inner();
    let actor = user.actor();
    let mut videos = video_db::list_for_creator(db.get_ref(), creator_id).await?;
    if actor.id != creator_id && !actor.is_admin() {
        videos.retain(|v| v.approval_status == ApprovalStatus::Approved);
    }
    Ok(HttpResponse::Ok().json(videos))
}

/// GET /api/videos/{id}
pub async fn get_video(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let actor = user.actor();
    let video = video_db::get_video(db.get_ref(), id).await?;
    if video.approval_status != ApprovalStatus::Approved
        && video.creator_id != actor.id
        && !actor.is_admin()
    {
        return Err(AppError::not_found("Video", id));
    }
    Ok(HttpResponse::Ok().json(video))
}

/// POST /api/videos/{id}/like
pub async fn like_video(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let video = video_db::like(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "likes": video.likes })))
}

/// POST /api/videos/{id}/view
pub async fn view_video(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let video = video_db::record_view(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "views": video.views })))
}

/// PUT /api/videos/{id}/moderation - admin only.
pub async fn moderate_video(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<ModerateVideo>,
) -> Result<HttpResponse, AppError> {
    let video =
        video_db::moderate(db.get_ref(), &user.actor(), path.into_inner(), body.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(video))
}
