use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `brand_profiles` table (1:1 with a brand user).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "brand_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub company_name: String,
    #[sea_orm(column_type = "Text")]
    pub bio: String,
    pub country: Option<String>,
    pub contact_email: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    pub website_url: Option<String>,
    pub industry_type: Option<String>,
    pub contests_created: i32,
    #[sea_orm(column_type = "Double")]
    pub total_prize_money: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBrandProfile {
    pub company_name: Option<String>,
    pub bio: Option<String>,
    pub country: Option<String>,
    pub contact_email: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    pub website_url: Option<String>,
    pub industry_type: Option<String>,
}
