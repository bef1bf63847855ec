use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::authorization::require_role;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::profiles;
use crate::error::AppError;
use crate::models::brand_profiles::UpdateBrandProfile;
use crate::models::creator_profiles::UpdateCreatorProfile;
use crate::models::users::Roles;

/// GET /api/profiles/creator - the caller's creator profile.
pub async fn get_creator_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    require_role(&user.actor(), Roles::Creator)?;
    let profile = profiles::ensure_creator_profile(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /api/profiles/creator
pub async fn update_creator_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<UpdateCreatorProfile>,
) -> Result<HttpResponse, AppError> {
    require_role(&user.actor(), Roles::Creator)?;
    let profile =
        profiles::update_creator_profile(db.get_ref(), user.0.id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// GET /api/profiles/brand - the caller's brand profile.
pub async fn get_brand_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    require_role(&user.actor(), Roles::Brand)?;
    let profile = profiles::get_brand_profile(db.get_ref(), user.0.id)
        .await?
        .ok_or_else(|| AppError::not_found("Brand profile", user.0.id))?;
    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /api/profiles/brand
pub async fn update_brand_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<UpdateBrandProfile>,
) -> Result<HttpResponse, AppError> {
    require_role(&user.actor(), Roles::Brand)?;
    let profile = profiles::update_brand_profile(db.get_ref(), user.0.id, body.into_inner())
        .await
        .map_err(|e| match e {
            sea_orm::DbErr::RecordNotFound(_) => AppError::not_found("Brand profile", user.0.id),
            other => other.into(),
        })?;
    Ok(HttpResponse::Ok().json(profile))
}
