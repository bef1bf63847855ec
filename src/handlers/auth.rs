use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheData, keys};
use crate::db::users;
use crate::error::AppError;
use crate::models::users::{CompleteProfile, UserResponse};

/// GET /api/auth/me - the currently authenticated user.
pub async fn me(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(UserResponse::from(user.0))
}

/// POST /api/auth/complete-profile - set role, names and phone after first login.
pub async fn complete_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    body: web::Json<CompleteProfile>,
) -> Result<HttpResponse, AppError> {
    let updated = users::complete_profile(db.get_ref(), user.0.id, body.into_inner()).await?;
    cache.invalidate(&keys::user(&updated.id.to_string())).await;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}
