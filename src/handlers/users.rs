use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheConfig, CacheData, keys};
use crate::db::users as user_db;
use crate::error::AppError;
use crate::models::PaginationQuery;
use crate::models::users::{UpdateUser, UserResponse};

/// GET /api/users?page=&limit= - page through users.
pub async fn get_users(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let (users, total) =
        user_db::get_users_paginated(db.get_ref(), query.page(), query.limit()).await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "users": users,
        "total": total,
        "page": query.page(),
        "limit": query.limit(),
    })))
}

/// GET /api/users/{id} - a single user, served from cache when possible.
pub async fn get_user(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    config: web::Data<CacheConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let response = cache
        .get_or_load(&keys::user(&id.to_string()), config.user_ttl, || async {
            user_db::get_user_by_id(db.get_ref(), id)
                .await?
                .map(UserResponse::from)
                .ok_or_else(|| AppError::not_found("User", id))
        })
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/users/{id} - update your own account.
pub async fn update_user(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateUser>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if user.0.id != id {
        return Err(AppError::Forbidden("You can only update your own account".into()));
    }

    let updated = user_db::update_user(db.get_ref(), id, body.into_inner()).await?;
    cache.invalidate(&keys::user(&id.to_string())).await;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// DELETE /api/users/{id} - delete your own account.
pub async fn delete_user(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if user.0.id != id {
        return Err(AppError::Forbidden("You can only delete your own account".into()));
    }

    let result = user_db::delete_user(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("User", id));
    }
    cache.invalidate(&keys::user(&id.to_string())).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("User {id} deleted"),
    })))
}
