use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum VideoCategory {
    #[sea_orm(string_value = "motion_graphics")]
    MotionGraphics,
    #[sea_orm(string_value = "animation")]
    Animation,
    #[sea_orm(string_value = "documentary")]
    Documentary,
    #[sea_orm(string_value = "performance")]
    Performance,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// SeaORM entity for the `videos` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "videos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub creator_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub category: VideoCategory,
    pub views: i32,
    pub likes: i32,
    pub duration_seconds: Option<i32>,
    pub is_featured: bool,
    pub approval_status: ApprovalStatus,
    pub approval_date: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Text")]
    pub approval_notes: String,
    pub contest_id: Option<Uuid>,
    #[sea_orm(unique)]
    pub submission_id: Option<Uuid>,
    pub is_standalone: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatorId",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(
        belongs_to = "super::submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::submissions::Column::Id"
    )]
    Submission,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct VideoQuery {
    pub creator_id: Option<Uuid>,
    pub contest_id: Option<Uuid>,
    pub is_standalone: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVideo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub category: Option<VideoCategory>,
    pub duration_seconds: Option<i32>,
}

impl CreateVideo {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() || self.url.trim().is_empty() {
            return Err(AppError::validation("Title and url are required"));
        }
        if matches!(self.duration_seconds, Some(d) if d < 0) {
            return Err(AppError::validation("Duration cannot be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModerateVideo {
    pub approval_status: ApprovalStatus,
    #[serde(default)]
    pub approval_notes: String,
}
