use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "all_picked")]
    AllPicked,
    #[sea_orm(string_value = "archived")]
    Archived,
}

/// Status a product must carry for the given stock level.
///
/// Archived is only ever entered or left through `set_archived`, so it is
/// returned unchanged here regardless of stock.
pub fn derive_status(stock_quantity: i32, current: ProductStatus) -> ProductStatus {
    match current {
        ProductStatus::Archived => ProductStatus::Archived,
        _ if stock_quantity <= 0 => ProductStatus::AllPicked,
        ProductStatus::AllPicked => ProductStatus::Available,
        other => other,
    }
}

/// SeaORM entity for the `products` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brand_id: Uuid,
    pub contest_id: Option<Uuid>,
    pub name: String,
    #[sea_orm(unique)]
    pub sku: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub stock_quantity: i32,
    pub status: ProductStatus,
    pub image_url: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    pub fn is_available(&self) -> bool {
        self.status == ProductStatus::Available && self.stock_quantity > 0
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::BrandId",
        to = "super::users::Column::Id"
    )]
    Brand,
    #[sea_orm(
        belongs_to = "super::contests::Entity",
        from = "Column::ContestId",
        to = "super::contests::Column::Id"
    )]
    Contest,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl Related<super::contests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub contest_id: Option<Uuid>,
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub stock_quantity: i32,
    pub image_url: Option<String>,
}

impl CreateProduct {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Product name is required"));
        }
        if self.sku.trim().is_empty() {
            return Err(AppError::validation("SKU is required"));
        }
        if self.price < 0.0 {
            return Err(AppError::validation("Price cannot be negative"));
        }
        if self.stock_quantity < 0 {
            return Err(AppError::validation("Stock quantity cannot be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub contest_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockAdjustment {
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetArchived {
    pub archived: bool,
}
