use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::applications::ApplicationStatus;
use super::contests::ContestStatus;
use super::users::Roles;
use crate::error::AppError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[sea_orm(string_value = "pending_approval")]
    PendingApproval,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "under_review")]
    UnderReview,
    #[sea_orm(string_value = "finalist")]
    Finalist,
    #[sea_orm(string_value = "won")]
    Won,
    #[sea_orm(string_value = "not_selected")]
    NotSelected,
}

/// SeaORM entity for the `submissions` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub contest_id: Uuid,
    pub creator_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub status: SubmissionStatus,
    #[sea_orm(column_type = "Text")]
    pub feedback: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,
    pub view_count: i32,
    pub terms_accepted: bool,
    pub terms_accepted_at: Option<DateTimeUtc>,
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

impl ActiveModelBehavior for ActiveModel {}

/// Checks whether a caller may submit to a contest, in a fixed order so
/// the first failing precondition is the one reported.
///
/// `application` is the status of the caller's application to this
/// contest, if they have one.
pub fn check_submission_gate(
    role: Roles,
    application: Option<ApplicationStatus>,
    contest_status: ContestStatus,
    already_submitted: bool,
    terms_accepted: bool,
) -> Result<(), AppError> {
    if role != Roles::Creator {
        return Err(AppError::RoleNotAllowed {
            required: Roles::Creator,
        });
    }
    if application != Some(ApplicationStatus::Approved) {
        return Err(AppError::ApplicationNotApproved);
    }
    if contest_status != ContestStatus::Live {
        return Err(AppError::ContestNotLive(contest_status));
    }
    if already_submitted {
        return Err(AppError::DuplicateSubmission);
    }
    if !terms_accepted {
        return Err(AppError::TermsNotAccepted);
    }
    Ok(())
}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubmission {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub terms_accepted: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewSubmission {
    pub status: SubmissionStatus,
    #[serde(default)]
    pub feedback: String,
}

impl ReviewSubmission {
    pub fn validate(&self) -> Result<(), AppError> {
        match self.status {
            SubmissionStatus::Approved => Ok(()),
            SubmissionStatus::Rejected if self.feedback.trim().is_empty() => Err(
                AppError::validation("Feedback is required when rejecting a submission"),
            ),
            SubmissionStatus::Rejected => Ok(()),
            _ => Err(AppError::validation(
                "Review status must be approved or rejected",
            )),
        }
    }
}
