use sea_orm::*;
use uuid::Uuid;

use crate::db::profiles;
use crate::error::AppError;
use crate::models::users::{self, CompleteProfile, CreateUserFromAuth, Roles, UpdateUser};

/// Create a new user from Supabase Auth JWT claims (called by auth middleware).
pub async fn find_or_create_from_auth(
    db: &DatabaseConnection,
    input: CreateUserFromAuth,
) -> Result<users::Model, DbErr> {
    if let Some(existing) = users::Entity::find_by_id(input.id).one(db).await? {
        return Ok(existing);
    }

    let new_user = users::ActiveModel {
        id: Set(input.id),
        email: Set(input.email),
        first_name: Set(None),
        last_name: Set(None),
        display_name: Set(input.display_name),
        avatar_url: Set(input.avatar_url),
        phone_number: Set(None),
        auth_provider: Set(input.auth_provider),
        role: Set(input.role),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_user.insert(db).await
}

/// Page through users, newest first.
pub async fn get_users_paginated(
    db: &DatabaseConnection,
    page: u64,
    limit: u64,
) -> Result<(Vec<users::Model>, u64), DbErr> {
    let paginator = users::Entity::find()
        .order_by_desc(users::Column::CreatedAt)
        .paginate(db, limit);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page.saturating_sub(1)).await?;
    Ok((items, total))
}

/// Fetch a single user by ID.
pub async fn get_user_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// Every active account holding `role`; the broadcast and new-contest fan-out
/// target.
pub async fn active_users_with_role<C: ConnectionTrait>(
    db: &C,
    role: Roles,
) -> Result<Vec<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Role.eq(role))
        .filter(users::Column::IsActive.eq(true))
        .all(db)
        .await
}

/// Finish onboarding: names, phone and role; the matching profile row is
/// created if it does not exist yet.
pub async fn complete_profile(
    db: &DatabaseConnection,
    id: Uuid,
    input: CompleteProfile,
) -> Result<users::Model, AppError> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;

    // Admin is never self-assigned.
    if input.role == Some(Roles::Admin) && user.role != Roles::Admin {
        return Err(AppError::Forbidden("Cannot assign the admin role".into()));
    }

    let role = input.role.unwrap_or(user.role);
    if role == Roles::Brand
        && input.company_name.as_deref().map(str::trim).unwrap_or_default().is_empty()
        && profiles::get_brand_profile(db, id).await?.is_none()
    {
        return Err(AppError::validation("Company name is required for brand accounts"));
    }

    let txn = db.begin().await?;

    let mut active: users::ActiveModel = user.into();
    active.role = Set(role);
    if let Some(first_name) = input.first_name {
        active.first_name = Set(Some(first_name));
    }
    if let Some(last_name) = input.last_name {
        active.last_name = Set(Some(last_name));
    }
    if let Some(display_name) = input.display_name {
        active.display_name = Set(Some(display_name));
    }
    if let Some(avatar_url) = input.avatar_url {
        active.avatar_url = Set(Some(avatar_url));
    }
    if let Some(phone_number) = input.phone_number {
        active.phone_number = Set(Some(phone_number));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));
    let user = active.update(&txn).await?;

    match role {
        Roles::Creator => {
            profiles::ensure_creator_profile(&txn, user.id).await?;
        }
        Roles::Brand => {
            profiles::ensure_brand_profile(&txn, user.id, input.company_name.unwrap_or_default())
                .await?;
        }
        Roles::Admin => {}
    }

    txn.commit().await?;
    Ok(user)
}

/// Update the caller's own account fields.
pub async fn update_user(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateUser,
) -> Result<users::Model, DbErr> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();

    if let Some(first_name) = input.first_name {
        active.first_name = Set(Some(first_name));
    }
    if let Some(last_name) = input.last_name {
        active.last_name = Set(Some(last_name));
    }
    if let Some(display_name) = input.display_name {
        active.display_name = Set(Some(display_name));
    }
    if let Some(avatar_url) = input.avatar_url {
        active.avatar_url = Set(Some(avatar_url));
    }
    if let Some(phone_number) = input.phone_number {
        active.phone_number = Set(Some(phone_number));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Delete a user by ID.
pub async fn delete_user(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    users::Entity::delete_by_id(id).exec(db).await
}
