use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// SeaORM entity for the `contest_applications` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contest_applications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub contest_id: Uuid,
    pub creator_id: Uuid,
    pub status: ApplicationStatus,
    pub terms_accepted: bool,
    #[sea_orm(column_type = "Text")]
    pub notes: String,
    pub full_name: Option<String>,
    pub shipping_address_line1: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_state: Option<String>,
    pub shipping_postal: Option<String>,
    pub shipping_country: Option<String>,
    pub product_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contests::Entity",
        from = "Column::ContestId",
        to = "super::contests::Column::Id"
    )]
    Contest,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatorId",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Product,
}

impl Related<super::contests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contest.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// What an approval request turns into once the current state is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalPlan {
    /// Already approved: return as is, stock untouched.
    AlreadyApproved,
    /// Take one unit from this product and approve.
    Reserve(Uuid),
}

/// Decides an approval from the application status and the bound product's
/// stock (`None` when no product is bound).
pub fn plan_approval(
    status: ApplicationStatus,
    product: Option<(Uuid, i32)>,
) -> Result<ApprovalPlan, AppError> {
    if status == ApplicationStatus::Approved {
        return Ok(ApprovalPlan::AlreadyApproved);
    }
    match product {
        None => Err(AppError::MissingProduct),
        Some((_, stock)) if stock <= 0 => Err(AppError::OutOfStock),
        Some((id, _)) => Ok(ApprovalPlan::Reserve(id)),
    }
}

/// Returns `false` when the application is already rejected (nothing to do).
pub fn check_rejection(status: ApplicationStatus) -> Result<bool, AppError> {
    match status {
        ApplicationStatus::Pending => Ok(true),
        ApplicationStatus::Rejected => Ok(false),
        ApplicationStatus::Approved => Err(AppError::InvalidTransition {
            from: ApplicationStatus::Approved.as_str().to_string(),
            to: ApplicationStatus::Rejected.as_str().to_string(),
        }),
    }
}

// ── DTOs ──

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ShippingAddress {
    pub line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal: Option<String>,
    pub country: Option<String>,
}

impl ShippingAddress {
    pub fn validate(&self) -> Result<(), AppError> {
        let missing = [
            ("line1", &self.line1),
            ("city", &self.city),
            ("postal", &self.postal),
            ("country", &self.country),
        ]
        .into_iter()
        .filter(|(_, v)| v.as_deref().map(str::trim).unwrap_or_default().is_empty())
        .map(|(name, _)| name)
        .collect::<Vec<_>>();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "Shipping address is missing: {}",
                missing.join(", ")
            )))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateApplication {
    #[serde(default)]
    pub terms_accepted: bool,
    #[serde(default)]
    pub notes: String,
    pub full_name: Option<String>,
    pub shipping_address: Option<ShippingAddress>,
    pub product_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateApplication {
    pub status: Option<ApplicationStatus>,
    pub notes: Option<String>,
    pub product_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RejectApplication {
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchApplications {
    pub ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_requires_a_product() {
        assert!(matches!(
            plan_approval(ApplicationStatus::Pending, None),
            Err(AppError::MissingProduct)
        ));
    }

    #[test]
    fn approval_with_empty_stock_is_refused() {
        let id = Uuid::new_v4();
        assert!(matches!(
            plan_approval(ApplicationStatus::Pending, Some((id, 0))),
            Err(AppError::OutOfStock)
        ));
    }

    #[test]
    fn approval_reserves_the_bound_product() {
        let id = Uuid::new_v4();
        assert_eq!(
            plan_approval(ApplicationStatus::Rejected, Some((id, 3))).unwrap(),
            ApprovalPlan::Reserve(id)
        );
    }

    #[test]
    fn reapproval_is_a_no_op_even_without_stock() {
        let id = Uuid::new_v4();
        assert_eq!(
            plan_approval(ApplicationStatus::Approved, Some((id, 0))).unwrap(),
            ApprovalPlan::AlreadyApproved
        );
    }

    #[test]
    fn approved_cannot_be_rejected() {
        assert!(matches!(
            check_rejection(ApplicationStatus::Approved),
            Err(AppError::InvalidTransition { .. })
        ));
        assert!(check_rejection(ApplicationStatus::Pending).unwrap());
        assert!(!check_rejection(ApplicationStatus::Rejected).unwrap());
    }

    #[test]
    fn shipping_address_lists_missing_fields() {
        let addr = ShippingAddress {
            line1: Some("1 Main St".into()),
            city: Some("  ".into()),
            ..Default::default()
        };
        let err = addr.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Shipping address is missing: city, postal, country"
        );
    }
}
