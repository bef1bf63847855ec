//! The submission gate and winner selection.
mod common;

use common::*;
use contest_backend::db::{
    contests as contest_db, profiles, submissions as submission_db, videos as video_db,
};
use contest_backend::error::AppError;
use contest_backend::models::applications::ApplicationStatus;
use contest_backend::models::contests::ContestStatus;
use contest_backend::models::submissions::{CreateSubmission, ReviewSubmission, SubmissionStatus};
use contest_backend::models::users::Roles;
use contest_backend::models::videos::ApprovalStatus;

fn entry() -> CreateSubmission {
    CreateSubmission {
        title: "My unboxing".into(),
        description: "Shot on a phone".into(),
        video_url: "https://cdn.example.com/v/1.mp4".into(),
        thumbnail_url: None,
        tags: vec!["unboxing".into(), "summer".into()],
        terms_accepted: true,
    }
}

#[tokio::test]
async fn approved_creator_submits_to_live_contest() {
    let db = setup_db().await;
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let contest = create_contest(&db, &brand, ContestStatus::Live).await;
    create_application(&db, &contest, &creator, None, ApplicationStatus::Approved).await;

    let submission = submission_db::create_submission(&db, &actor(&creator), contest.id, entry())
        .await
        .unwrap();
    assert_eq!(submission.status, SubmissionStatus::PendingApproval);
    assert!(submission.terms_accepted_at.is_some());
    assert_eq!(submission.tags, serde_json::json!(["unboxing", "summer"]));

    // Participation is counted and a pending video mirrors the entry.
    let profile = profiles::get_creator_profile(&db, creator.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.contest_participations, 1);
    let videos = video_db::list_for_creator(&db, creator.id).await.unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].submission_id, Some(submission.id));
    assert_eq!(videos[0].approval_status, ApprovalStatus::Pending);
    assert!(!videos[0].is_standalone);
}

#[tokio::test]
async fn gate_rejects_in_order() {
    let db = setup_db().await;
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let live = create_contest(&db, &brand, ContestStatus::Live).await;

    // Wrong role is reported before anything about the contest.
    let err = submission_db::create_submission(&db, &actor(&brand), live.id, entry())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::RoleNotAllowed { required: Roles::Creator }));

    let err = submission_db::create_submission(&db, &actor(&creator), live.id, entry())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ApplicationNotApproved));

    let pending_creator = create_user(&db, Roles::Creator).await;
    create_application(&db, &live, &pending_creator, None, ApplicationStatus::Pending).await;
    let err = submission_db::create_submission(&db, &actor(&pending_creator), live.id, entry())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ApplicationNotApproved));

    let judging = create_contest(&db, &brand, ContestStatus::Judging).await;
    create_application(&db, &judging, &creator, None, ApplicationStatus::Approved).await;
    let err = submission_db::create_submission(&db, &actor(&creator), judging.id, entry())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ContestNotLive(ContestStatus::Judging)));

    create_application(&db, &live, &creator, None, ApplicationStatus::Approved).await;
    let mut unsigned = entry();
    unsigned.terms_accepted = false;
    let err = submission_db::create_submission(&db, &actor(&creator), live.id, unsigned)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TermsNotAccepted));
}

#[tokio::test]
async fn gate_is_checked_before_the_payload() {
    let db = setup_db().await;
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let contest = create_contest(&db, &brand, ContestStatus::Live).await;

    let mut blank = entry();
    blank.title = "  ".into();
    blank.video_url = String::new();
    let err = submission_db::create_submission(&db, &actor(&creator), contest.id, blank.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ApplicationNotApproved));

    create_application(&db, &contest, &creator, None, ApplicationStatus::Approved).await;
    let err = submission_db::create_submission(&db, &actor(&creator), contest.id, blank)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn one_submission_per_contest() {
    let db = setup_db().await;
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let contest = create_contest(&db, &brand, ContestStatus::Live).await;
    create_application(&db, &contest, &creator, None, ApplicationStatus::Approved).await;

    submission_db::create_submission(&db, &actor(&creator), contest.id, entry())
        .await
        .unwrap();
    let err = submission_db::create_submission(&db, &actor(&creator), contest.id, entry())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateSubmission));
}

#[tokio::test]
async fn review_requires_feedback_to_reject() {
    let db = setup_db().await;
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let contest = create_contest(&db, &brand, ContestStatus::Live).await;
    create_application(&db, &contest, &creator, None, ApplicationStatus::Approved).await;
    let submission = submission_db::create_submission(&db, &actor(&creator), contest.id, entry())
        .await
        .unwrap();

    let err = submission_db::review_submission(
        &db,
        &actor(&brand),
        submission.id,
        ReviewSubmission {
            status: SubmissionStatus::Rejected,
            feedback: "  ".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let reviewed = submission_db::review_submission(
        &db,
        &actor(&brand),
        submission.id,
        ReviewSubmission {
            status: SubmissionStatus::Approved,
            feedback: "Great lighting".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(reviewed.status, SubmissionStatus::Approved);
    assert_eq!(reviewed.feedback, "Great lighting");

    let err = submission_db::review_submission(
        &db,
        &actor(&creator),
        submission.id,
        ReviewSubmission {
            status: SubmissionStatus::Approved,
            feedback: String::new(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn selecting_a_winner_closes_the_contest() {
    let db = setup_db().await;
    let brand = create_user(&db, Roles::Brand).await;
    let contest = create_contest(&db, &brand, ContestStatus::Live).await;

    let winner_creator = create_user(&db, Roles::Creator).await;
    let runner_up = create_user(&db, Roles::Creator).await;
    let mut entries = Vec::new();
    for creator in [&winner_creator, &runner_up] {
        create_application(&db, &contest, creator, None, ApplicationStatus::Approved).await;
        entries.push(
            submission_db::create_submission(&db, &actor(creator), contest.id, entry())
                .await
                .unwrap(),
        );
    }

    let selection =
        submission_db::select_winner(&db, &actor(&brand), contest.id, entries[0].id)
            .await
            .unwrap();
    assert_eq!(selection.winner.status, SubmissionStatus::Won);
    assert_eq!(selection.other_creator_ids, vec![runner_up.id]);

    let contest = contest_db::get_contest(&db, contest.id).await.unwrap();
    assert_eq!(contest.status, ContestStatus::Completed);
    assert_eq!(contest.winner_submission_id, Some(entries[0].id));

    let other = submission_db::get_submission(&db, entries[1].id).await.unwrap();
    assert_eq!(other.status, SubmissionStatus::NotSelected);

    let profile = profiles::get_creator_profile(&db, winner_creator.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.contest_wins, 1);
    assert!((profile.total_earnings - contest.prize).abs() < f64::EPSILON);

    // A completed contest is final.
    let err = submission_db::select_winner(&db, &actor(&brand), contest.id, entries[1].id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ContestCompleted));
}
