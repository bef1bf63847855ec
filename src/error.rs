use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

use crate::models::contests::ContestStatus;
use crate::models::users::Roles;

/// Every failure a domain operation can report.
///
/// All variants except `Database` are expected outcomes the caller can act
/// on; `Database` is the catch-all for an unavailable or misbehaving store.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Quantity must be greater than 0")]
    InvalidQuantity,

    #[error("Insufficient stock. Available: {available}, Requested: {requested}")]
    InsufficientStock { available: i32, requested: i32 },

    #[error("Cannot approve application: product is out of stock")]
    OutOfStock,

    #[error("Cannot approve application: no product is bound to it")]
    MissingProduct,

    #[error("You have already applied to this contest")]
    DuplicateApplication,

    #[error("You have already submitted to this contest")]
    DuplicateSubmission,

    #[error("A product with SKU {0} already exists")]
    DuplicateSku(String),

    #[error("You must apply and be approved to submit to this contest")]
    ApplicationNotApproved,

    #[error("This contest is not live (status: {})", .0.as_str())]
    ContestNotLive(ContestStatus),

    #[error("Only {} accounts can perform this action", .required.as_str())]
    RoleNotAllowed { required: Roles },

    #[error("You must accept the terms and conditions")]
    TermsNotAccepted,

    #[error("Cannot move from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Product {0} is not attached to this contest")]
    ProductNotInContest(Uuid),

    #[error("Completed contests cannot be edited")]
    ContestCompleted,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl AppError {
    pub fn not_found(what: &str, id: Uuid) -> Self {
        AppError::NotFound(format!("{what} {id}"))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// Stable machine-readable name, returned as `kind` in error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidQuantity => "invalid_quantity",
            AppError::InsufficientStock { .. } => "insufficient_stock",
            AppError::OutOfStock => "out_of_stock",
            AppError::MissingProduct => "missing_product",
            AppError::DuplicateApplication => "duplicate_application",
            AppError::DuplicateSubmission => "duplicate_submission",
            AppError::DuplicateSku(_) => "duplicate_sku",
            AppError::ApplicationNotApproved => "application_not_approved",
            AppError::ContestNotLive(_) => "contest_not_live",
            AppError::RoleNotAllowed { .. } => "role_not_allowed",
            AppError::TermsNotAccepted => "terms_not_accepted",
            AppError::InvalidTransition { .. } => "invalid_transition",
            AppError::ProductNotInContest(_) => "product_not_in_contest",
            AppError::ContestCompleted => "contest_completed",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation",
            AppError::Database(_) => "internal",
        }
    }
}

/// True when the store rejected a write because of a unique index.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidQuantity
            | AppError::MissingProduct
            | AppError::TermsNotAccepted
            | AppError::ProductNotInContest(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InsufficientStock { .. }
            | AppError::OutOfStock
            | AppError::DuplicateApplication
            | AppError::DuplicateSubmission
            | AppError::DuplicateSku(_)
            | AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::ApplicationNotApproved
            | AppError::ContestNotLive(_)
            | AppError::RoleNotAllowed { .. }
            | AppError::ContestCompleted
            | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                serde_json::json!({
                    "error": "Internal server error",
                    "kind": self.kind(),
                })
            }
            AppError::InsufficientStock {
                available,
                requested,
            } => serde_json::json!({
                "error": self.to_string(),
                "kind": self.kind(),
                "available": available,
                "requested": requested,
            }),
            AppError::ContestNotLive(status) => serde_json::json!({
                "error": self.to_string(),
                "kind": self.kind(),
                "status": status,
            }),
            AppError::RoleNotAllowed { required } => serde_json::json!({
                "error": self.to_string(),
                "kind": self.kind(),
                "required_role": required,
            }),
            _ => serde_json::json!({
                "error": self.to_string(),
                "kind": self.kind(),
            }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_reports_both_quantities() {
        let err = AppError::InsufficientStock {
            available: 2,
            requested: 5,
        };
        assert_eq!(err.to_string(), "Insufficient stock. Available: 2, Requested: 5");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.kind(), "insufficient_stock");
    }

    #[test]
    fn submission_preconditions_are_client_errors() {
        for err in [
            AppError::ApplicationNotApproved,
            AppError::ContestNotLive(ContestStatus::Closed),
            AppError::RoleNotAllowed {
                required: Roles::Creator,
            },
        ] {
            assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        }
        assert_eq!(
            AppError::TermsNotAccepted.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn role_message_uses_lowercase_role() {
        let err = AppError::RoleNotAllowed {
            required: Roles::Brand,
        };
        assert_eq!(err.to_string(), "Only brand accounts can perform this action");
    }

    #[test]
    fn database_errors_are_internal() {
        let err = AppError::from(DbErr::Custom("connection refused".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.kind(), "internal");
    }
}
