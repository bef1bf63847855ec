use chrono::Utc;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum ContestStatus {
    #[sea_orm(string_value = "upcoming")]
    Upcoming,
    #[sea_orm(string_value = "live")]
    Live,
    #[sea_orm(string_value = "closed")]
    Closed,
    #[sea_orm(string_value = "judging")]
    Judging,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl ContestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContestStatus::Upcoming => "upcoming",
            ContestStatus::Live => "live",
            ContestStatus::Closed => "closed",
            ContestStatus::Judging => "judging",
            ContestStatus::Completed => "completed",
        }
    }
}

/// SeaORM entity for the `contests` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brand_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub brief: String,
    #[sea_orm(column_type = "Text")]
    pub inspiration: String,
    #[sea_orm(column_type = "Text")]
    pub rules: String,
    #[sea_orm(column_type = "Double")]
    pub prize: f64,
    pub deadline: DateTimeUtc,
    pub status: ContestStatus,
    pub region: String,
    pub language: String,
    pub max_entries: Option<i32>,
    pub is_featured: bool,
    pub view_count: i32,
    pub thumbnail_url: Option<String>,
    pub winner_submission_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    pub fn is_live(&self) -> bool {
        self.status == ContestStatus::Live
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
    #[sea_orm(has_many = "super::applications::Entity")]
    Applications,
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
    #[sea_orm(has_many = "super::products::Entity")]
    Products,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl Related<super::applications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateContest {
    pub title: String,
    pub description: String,
    pub brief: String,
    #[serde(default)]
    pub inspiration: String,
    #[serde(default)]
    pub rules: String,
    pub prize: f64,
    pub deadline: DateTimeUtc,
    #[serde(default)]
    pub region: String,
    pub language: Option<String>,
    pub max_entries: Option<i32>,
    #[serde(default)]
    pub is_featured: bool,
    pub thumbnail_url: Option<String>,
}

impl CreateContest {
    pub fn validate(&self, now: DateTimeUtc) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::validation("Title is required"));
        }
        if self.prize <= 0.0 {
            return Err(AppError::validation("Prize must be greater than 0"));
        }
        if self.deadline <= now {
            return Err(AppError::validation("Deadline must be in the future"));
        }
        if matches!(self.max_entries, Some(n) if n <= 0) {
            return Err(AppError::validation("Max entries must be greater than 0"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub brief: Option<String>,
    pub inspiration: Option<String>,
    pub rules: Option<String>,
    pub prize: Option<f64>,
    pub deadline: Option<DateTimeUtc>,
    pub region: Option<String>,
    pub language: Option<String>,
    pub max_entries: Option<i32>,
    pub is_featured: Option<bool>,
    pub thumbnail_url: Option<String>,
}

impl UpdateContest {
    pub fn validate(&self) -> Result<(), AppError> {
        if matches!(self.prize, Some(p) if p <= 0.0) {
            return Err(AppError::validation("Prize must be greater than 0"));
        }
        if matches!(self.deadline, Some(d) if d <= Utc::now()) {
            return Err(AppError::validation("Deadline must be in the future"));
        }
        if matches!(self.max_entries, Some(n) if n <= 0) {
            return Err(AppError::validation("Max entries must be greater than 0"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContestStatus {
    pub status: ContestStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContestSearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectWinner {
    pub submission_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn input() -> CreateContest {
        CreateContest {
            title: "Summer spot".into(),
            description: "A 30s spot".into(),
            brief: "Bright, upbeat".into(),
            inspiration: String::new(),
            rules: String::new(),
            prize: 500.0,
            deadline: Utc::now() + Duration::days(14),
            region: String::new(),
            language: None,
            max_entries: None,
            is_featured: false,
            thumbnail_url: None,
        }
    }

    #[test]
    fn accepts_a_well_formed_contest() {
        assert!(input().validate(Utc::now()).is_ok());
    }

    #[test]
    fn rejects_non_positive_prize() {
        let mut c = input();
        c.prize = 0.0;
        assert!(matches!(c.validate(Utc::now()), Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_past_deadline() {
        let mut c = input();
        c.deadline = Utc::now() - Duration::hours(1);
        assert!(matches!(c.validate(Utc::now()), Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_zero_max_entries() {
        let mut c = input();
        c.max_entries = Some(0);
        assert!(c.validate(Utc::now()).is_err());
    }
}
