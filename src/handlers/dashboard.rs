use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::authorization::require_role;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::{profiles, submissions as submission_db, videos as video_db};
use crate::error::AppError;
use crate::models::contests::{self, ContestStatus};
use crate::models::submissions::{self, SubmissionStatus};
use crate::models::users::Roles;

type Entry = (submissions::Model, Option<contests::Model>);

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_submissions: usize,
    pub total_videos: u64,
    pub contests_won: usize,
    pub active_submissions: usize,
    pub finalist_entries: usize,
}

#[derive(Debug, Serialize)]
pub struct EntryView {
    pub submission: submissions::Model,
    pub contest: Option<contests::Model>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct ContestEarning {
    pub contest_id: Uuid,
    pub contest_title: String,
    pub prize: f64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct EarningsSummary {
    pub total_earnings: f64,
    pub contests_won: usize,
    pub breakdown: Vec<ContestEarning>,
}

fn contest_status(entry: &Entry) -> Option<ContestStatus> {
    entry.1.as_ref().map(|c| c.status)
}

pub fn dashboard_stats(entries: &[Entry], total_videos: u64) -> DashboardStats {
    DashboardStats {
        total_submissions: entries.len(),
        total_videos,
        contests_won: entries
            .iter()
            .filter(|(s, _)| s.status == SubmissionStatus::Won)
            .count(),
        active_submissions: entries
            .iter()
            .filter(|e| contest_status(e) == Some(ContestStatus::Live))
            .count(),
        finalist_entries: entries
            .iter()
            .filter(|(s, _)| s.status == SubmissionStatus::Finalist)
            .count(),
    }
}

/// Split entries into those whose contest still takes entries or is being
/// judged, and those whose contest has ended.
pub fn split_running(entries: Vec<Entry>) -> (Vec<EntryView>, Vec<EntryView>) {
    let mut running = Vec::new();
    let mut ended = Vec::new();
    for (submission, contest) in entries {
        let is_running = matches!(
            contest.as_ref().map(|c| c.status),
            Some(ContestStatus::Upcoming | ContestStatus::Live | ContestStatus::Judging)
        );
        let view = EntryView {
            submission,
            contest,
        };
        if is_running {
            running.push(view);
        } else {
            ended.push(view);
        }
    }
    (running, ended)
}

/// Prize money from every won entry.
pub fn earnings_summary(entries: &[Entry]) -> EarningsSummary {
    let breakdown: Vec<ContestEarning> = entries
        .iter()
        .filter(|(s, _)| s.status == SubmissionStatus::Won)
        .filter_map(|(_, c)| c.as_ref())
        .map(|c| ContestEarning {
            contest_id: c.id,
            contest_title: c.title.clone(),
            prize: c.prize,
        })
        .collect();
    EarningsSummary {
        total_earnings: breakdown.iter().map(|e| e.prize).sum(),
        contests_won: breakdown.len(),
        breakdown,
    }
}

/// GET /api/creator/dashboard
pub async fn creator_dashboard(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    require_role(&user.actor(), Roles::Creator)?;
    let entries = submission_db::list_for_creator_with_contests(db.get_ref(), user.0.id).await?;
    let total_videos = video_db::count_for_creator(db.get_ref(), user.0.id).await?;

    let stats = dashboard_stats(&entries, total_videos);
    let (running, ended) = split_running(entries);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "stats": stats,
        "running": running,
        "ended": ended,
    })))
}

/// GET /api/creator/submissions
pub async fn creator_submissions(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    require_role(&user.actor(), Roles::Creator)?;
    let submissions = submission_db::list_for_creator(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(submissions))
}

/// GET /api/creator/earnings - recomputed from won entries. The stored
/// profile total follows the recomputed figure.
pub async fn creator_earnings(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    require_role(&user.actor(), Roles::Creator)?;
    let entries = submission_db::list_for_creator_with_contests(db.get_ref(), user.0.id).await?;
    let summary = earnings_summary(&entries);

    let profile = profiles::ensure_creator_profile(db.get_ref(), user.0.id).await?;
    if (profile.total_earnings - summary.total_earnings).abs() > f64::EPSILON {
        profiles::set_total_earnings(db.get_ref(), user.0.id, summary.total_earnings).await?;
        tracing::info!(
            creator_id = %user.0.id,
            total = summary.total_earnings,
            "Synchronized stored earnings"
        );
    }
    Ok(HttpResponse::Ok().json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn contest(status: ContestStatus, prize: f64) -> contests::Model {
        let now = Utc::now();
        contests::Model {
            id: Uuid::new_v4(),
            brand_id: Uuid::new_v4(),
            title: format!("Contest {prize}"),
            description: String::new(),
            brief: String::new(),
            inspiration: String::new(),
            rules: String::new(),
            prize,
            deadline: now + Duration::days(7),
            status,
            region: "global".into(),
            language: "en".into(),
            max_entries: None,
            is_featured: false,
            view_count: 0,
            thumbnail_url: None,
            winner_submission_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn entry(status: SubmissionStatus, contest: contests::Model) -> Entry {
        let now = Utc::now();
        let submission = submissions::Model {
            id: Uuid::new_v4(),
            contest_id: contest.id,
            creator_id: Uuid::new_v4(),
            title: "Entry".into(),
            description: String::new(),
            video_url: "https://cdn.example/v.mp4".into(),
            thumbnail_url: None,
            status,
            feedback: String::new(),
            tags: serde_json::json!([]),
            view_count: 0,
            terms_accepted: true,
            terms_accepted_at: Some(now),
            created_at: now,
            updated_at: now,
        };
        (submission, Some(contest))
    }

    #[test]
    fn stats_count_by_status() {
        let entries = vec![
            entry(SubmissionStatus::PendingApproval, contest(ContestStatus::Live, 100.0)),
            entry(SubmissionStatus::Finalist, contest(ContestStatus::Judging, 200.0)),
            entry(SubmissionStatus::Won, contest(ContestStatus::Completed, 300.0)),
        ];
        let stats = dashboard_stats(&entries, 4);
        assert_eq!(
            stats,
            DashboardStats {
                total_submissions: 3,
                total_videos: 4,
                contests_won: 1,
                active_submissions: 1,
                finalist_entries: 1,
            }
        );
    }

    #[test]
    fn completed_and_closed_contests_are_ended() {
        let entries = vec![
            entry(SubmissionStatus::Approved, contest(ContestStatus::Live, 1.0)),
            entry(SubmissionStatus::Won, contest(ContestStatus::Completed, 1.0)),
            entry(SubmissionStatus::NotSelected, contest(ContestStatus::Closed, 1.0)),
        ];
        let (running, ended) = split_running(entries);
        assert_eq!(running.len(), 1);
        assert_eq!(ended.len(), 2);
    }

    #[test]
    fn earnings_sum_only_won_entries() {
        let entries = vec![
            entry(SubmissionStatus::Won, contest(ContestStatus::Completed, 250.0)),
            entry(SubmissionStatus::NotSelected, contest(ContestStatus::Completed, 900.0)),
            entry(SubmissionStatus::Won, contest(ContestStatus::Completed, 50.0)),
        ];
        let summary = earnings_summary(&entries);
        assert_eq!(summary.contests_won, 2);
        assert!((summary.total_earnings - 300.0).abs() < f64::EPSILON);
        assert_eq!(summary.breakdown.len(), 2);
    }

    #[test]
    fn no_wins_means_zero() {
        let summary = earnings_summary(&[]);
        assert_eq!(summary.total_earnings, 0.0);
        assert!(summary.breakdown.is_empty());
    }
}
