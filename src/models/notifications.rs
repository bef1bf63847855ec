use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::users::Roles;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    #[sea_orm(string_value = "new_contest")]
    NewContest,
    #[sea_orm(string_value = "contest_closed")]
    ContestClosed,
    #[sea_orm(string_value = "winner_chosen")]
    WinnerChosen,
    #[sea_orm(string_value = "new_submission")]
    NewSubmission,
    #[sea_orm(string_value = "submission_feedback")]
    SubmissionFeedback,
    #[sea_orm(string_value = "application_approved")]
    ApplicationApproved,
    #[sea_orm(string_value = "application_rejected")]
    ApplicationRejected,
}

/// Which table `related_id` points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum RelatedKind {
    #[sea_orm(string_value = "contest")]
    Contest,
    #[sea_orm(string_value = "submission")]
    Submission,
    #[sea_orm(string_value = "application")]
    Application,
}

/// SeaORM entity for the `notifications` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub notification_type: NotificationType,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub is_read: bool,
    pub related_kind: Option<RelatedKind>,
    pub related_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::RecipientId",
        to = "super::users::Column::Id"
    )]
    Recipient,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// An in-app notification about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub related: Option<(RelatedKind, Uuid)>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastNotification {
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub recipient_role: Roles,
}
