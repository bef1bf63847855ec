use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::*;
use uuid::Uuid;

use crate::models::brand_profiles::{self, UpdateBrandProfile};
use crate::models::creator_profiles::{self, ExperienceLevel, UpdateCreatorProfile};

pub async fn get_creator_profile<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<Option<creator_profiles::Model>, DbErr> {
    creator_profiles::Entity::find_by_id(user_id).one(db).await
}

pub async fn get_brand_profile<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<Option<brand_profiles::Model>, DbErr> {
    brand_profiles::Entity::find_by_id(user_id).one(db).await
}

/// Return the creator profile, inserting an empty one first if needed.
pub async fn ensure_creator_profile<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<creator_profiles::Model, DbErr> {
    if let Some(existing) = get_creator_profile(db, user_id).await? {
        return Ok(existing);
    }

    let now = Utc::now();
    creator_profiles::ActiveModel {
        user_id: Set(user_id),
        bio: Set(String::new()),
        shipping_address_line1: Set(None),
        shipping_address_line2: Set(None),
        shipping_city: Set(None),
        shipping_state: Set(None),
        shipping_postal_code: Set(None),
        shipping_country: Set(None),
        receive_sms_notifications: Set(false),
        experience_level: Set(ExperienceLevel::Beginner),
        portfolio_url: Set(None),
        total_earnings: Set(0.0),
        contest_wins: Set(0),
        contest_participations: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
}

/// Return the brand profile, inserting one with `company_name` if needed.
pub async fn ensure_brand_profile<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    company_name: String,
) -> Result<brand_profiles::Model, DbErr> {
    if let Some(existing) = get_brand_profile(db, user_id).await? {
        return Ok(existing);
    }

    let now = Utc::now();
    brand_profiles::ActiveModel {
        user_id: Set(user_id),
        company_name: Set(company_name),
        bio: Set(String::new()),
        country: Set(None),
        contact_email: Set(None),
        contact_person: Set(None),
        contact_phone: Set(None),
        website_url: Set(None),
        industry_type: Set(None),
        contests_created: Set(0),
        total_prize_money: Set(0.0),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
}

pub async fn update_creator_profile(
    db: &DatabaseConnection,
    user_id: Uuid,
    input: UpdateCreatorProfile,
) -> Result<creator_profiles::Model, DbErr> {
    let profile = ensure_creator_profile(db, user_id).await?;
    let mut active: creator_profiles::ActiveModel = profile.into();

    if let Some(bio) = input.bio {
        active.bio = Set(bio);
    }
    if let Some(v) = input.shipping_address_line1 {
        active.shipping_address_line1 = Set(Some(v));
    }
    if let Some(v) = input.shipping_address_line2 {
        active.shipping_address_line2 = Set(Some(v));
    }
    if let Some(v) = input.shipping_city {
        active.shipping_city = Set(Some(v));
    }
    if let Some(v) = input.shipping_state {
        active.shipping_state = Set(Some(v));
    }
    if let Some(v) = input.shipping_postal_code {
        active.shipping_postal_code = Set(Some(v));
    }
    if let Some(v) = input.shipping_country {
        active.shipping_country = Set(Some(v));
    }
    if let Some(v) = input.receive_sms_notifications {
        active.receive_sms_notifications = Set(v);
    }
    if let Some(v) = input.experience_level {
        active.experience_level = Set(v);
    }
    if let Some(v) = input.portfolio_url {
        active.portfolio_url = Set(Some(v));
    }
    active.updated_at = Set(Utc::now());

    active.update(db).await
}

pub async fn update_brand_profile(
    db: &DatabaseConnection,
    user_id: Uuid,
    input: UpdateBrandProfile,
) -> Result<brand_profiles::Model, DbErr> {
    let profile = get_brand_profile(db, user_id)
        .await?
        .ok_or(DbErr::RecordNotFound("Brand profile not found".to_string()))?;
    let mut active: brand_profiles::ActiveModel = profile.into();

    if let Some(v) = input.company_name {
        active.company_name = Set(v);
    }
    if let Some(v) = input.bio {
        active.bio = Set(v);
    }
    if let Some(v) = input.country {
        active.country = Set(Some(v));
    }
    if let Some(v) = input.contact_email {
        active.contact_email = Set(Some(v));
    }
    if let Some(v) = input.contact_person {
        active.contact_person = Set(Some(v));
    }
    if let Some(v) = input.contact_phone {
        active.contact_phone = Set(Some(v));
    }
    if let Some(v) = input.website_url {
        active.website_url = Set(Some(v));
    }
    if let Some(v) = input.industry_type {
        active.industry_type = Set(Some(v));
    }
    active.updated_at = Set(Utc::now());

    active.update(db).await
}

/// `contest_participations += 1` for a creator, creating the profile if absent.
pub async fn record_participation<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<(), DbErr> {
    ensure_creator_profile(db, user_id).await?;
    creator_profiles::Entity::update_many()
        .col_expr(
            creator_profiles::Column::ContestParticipations,
            Expr::col(creator_profiles::Column::ContestParticipations).add(1),
        )
        .filter(creator_profiles::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(())
}

/// `contest_wins += 1` and `total_earnings += prize` for a contest winner.
pub async fn record_win<C: ConnectionTrait>(db: &C, user_id: Uuid, prize: f64) -> Result<(), DbErr> {
    ensure_creator_profile(db, user_id).await?;
    creator_profiles::Entity::update_many()
        .col_expr(
            creator_profiles::Column::ContestWins,
            Expr::col(creator_profiles::Column::ContestWins).add(1),
        )
        .col_expr(
            creator_profiles::Column::TotalEarnings,
            Expr::col(creator_profiles::Column::TotalEarnings).add(prize),
        )
        .col_expr(creator_profiles::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(creator_profiles::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Overwrite the stored earnings total with a recomputed figure.
pub async fn set_total_earnings(
    db: &DatabaseConnection,
    user_id: Uuid,
    total: f64,
) -> Result<(), DbErr> {
    creator_profiles::Entity::update_many()
        .col_expr(creator_profiles::Column::TotalEarnings, Expr::value(total))
        .col_expr(creator_profiles::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(creator_profiles::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(())
}

/// `contests_created += 1` and `total_prize_money += prize` for a brand.
pub async fn record_contest_created<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    prize: f64,
) -> Result<(), DbErr> {
    brand_profiles::Entity::update_many()
        .col_expr(
            brand_profiles::Column::ContestsCreated,
            Expr::col(brand_profiles::Column::ContestsCreated).add(1),
        )
        .col_expr(
            brand_profiles::Column::TotalPrizeMoney,
            Expr::col(brand_profiles::Column::TotalPrizeMoney).add(prize),
        )
        .filter(brand_profiles::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(())
}
