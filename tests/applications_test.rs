//! Application lifecycle: creation rules, approval with stock reservation,
//! rejection and the race for the last unit.
mod common;

use common::*;
use contest_backend::db::applications as application_db;
use contest_backend::db::products as product_db;
use contest_backend::error::AppError;
use contest_backend::models::applications::{
    ApplicationStatus, CreateApplication, ShippingAddress, UpdateApplication,
};
use contest_backend::models::contests::ContestStatus;
use contest_backend::models::products::ProductStatus;
use contest_backend::models::users::Roles;
use uuid::Uuid;

fn application_input(product_id: Option<Uuid>) -> CreateApplication {
    CreateApplication {
        terms_accepted: true,
        notes: "Big fan".into(),
        full_name: Some("Dana Creator".into()),
        shipping_address: Some(ShippingAddress {
            line1: Some("12 Rua Augusta".into()),
            city: Some("Lisbon".into()),
            state: None,
            postal: Some("1100-053".into()),
            country: Some("PT".into()),
        }),
        product_id,
    }
}

#[tokio::test]
async fn creator_applies_to_live_contest() {
    let db = setup_db().await;
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let contest = create_contest(&db, &brand, ContestStatus::Live).await;
    let product = create_product(&db, &brand, Some(&contest), 3).await;

    let application = application_db::create_application(
        &db,
        &actor(&creator),
        contest.id,
        application_input(Some(product.id)),
    )
    .await
    .unwrap();

    assert_eq!(application.status, ApplicationStatus::Pending);
    assert_eq!(application.product_id, Some(product.id));
    assert_eq!(application.shipping_city.as_deref(), Some("Lisbon"));

    // Applying reserves nothing.
    let product = product_db::get_product(&db, product.id).await.unwrap();
    assert_eq!(product.stock_quantity, 3);
}

#[tokio::test]
async fn second_application_is_a_duplicate() {
    let db = setup_db().await;
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let contest = create_contest(&db, &brand, ContestStatus::Live).await;

    application_db::create_application(&db, &actor(&creator), contest.id, application_input(None))
        .await
        .unwrap();
    let err = application_db::create_application(
        &db,
        &actor(&creator),
        contest.id,
        application_input(None),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::DuplicateApplication));
}

#[tokio::test]
async fn application_preconditions() {
    let db = setup_db().await;
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let upcoming = create_contest(&db, &brand, ContestStatus::Upcoming).await;
    let live = create_contest(&db, &brand, ContestStatus::Live).await;
    let elsewhere = create_product(&db, &brand, Some(&upcoming), 3).await;

    let err = application_db::create_application(
        &db,
        &actor(&brand),
        live.id,
        application_input(None),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::RoleNotAllowed { required: Roles::Creator }));

    let err = application_db::create_application(
        &db,
        &actor(&creator),
        upcoming.id,
        application_input(None),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::ContestNotLive(ContestStatus::Upcoming)));

    let mut no_terms = application_input(None);
    no_terms.terms_accepted = false;
    let err = application_db::create_application(&db, &actor(&creator), live.id, no_terms)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TermsNotAccepted));

    let mut no_address = application_input(None);
    no_address.shipping_address = None;
    let err = application_db::create_application(&db, &actor(&creator), live.id, no_address)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = application_db::create_application(
        &db,
        &actor(&creator),
        live.id,
        application_input(Some(elsewhere.id)),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::ProductNotInContest(id) if id == elsewhere.id));
}

#[tokio::test]
async fn approval_takes_exactly_one_unit() {
    let db = setup_db().await;
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let contest = create_contest(&db, &brand, ContestStatus::Live).await;
    let product = create_product(&db, &brand, Some(&contest), 2).await;
    let application = create_application(
        &db,
        &contest,
        &creator,
        Some(&product),
        ApplicationStatus::Pending,
    )
    .await;

    let result = application_db::approve_application(&db, &actor(&brand), application.id)
        .await
        .unwrap();
    assert!(result.newly_approved);
    assert_eq!(result.application.status, ApplicationStatus::Approved);
    assert_eq!(result.product.unwrap().stock_quantity, 1);

    // Approving again changes nothing.
    let again = application_db::approve_application(&db, &actor(&brand), application.id)
        .await
        .unwrap();
    assert!(!again.newly_approved);
    let product = product_db::get_product(&db, product.id).await.unwrap();
    assert_eq!(product.stock_quantity, 1);
}

#[tokio::test]
async fn approving_the_last_unit_marks_product_all_picked() {
    let db = setup_db().await;
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let contest = create_contest(&db, &brand, ContestStatus::Live).await;
    let product = create_product(&db, &brand, Some(&contest), 1).await;
    let application = create_application(
        &db,
        &contest,
        &creator,
        Some(&product),
        ApplicationStatus::Rejected,
    )
    .await;

    // A rejected application can still be approved.
    let result = application_db::approve_application(&db, &actor(&brand), application.id)
        .await
        .unwrap();
    let product = result.product.unwrap();
    assert_eq!(product.stock_quantity, 0);
    assert_eq!(product.status, ProductStatus::AllPicked);
}

#[tokio::test]
async fn out_of_stock_leaves_everything_unchanged() {
    let db = setup_db().await;
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let contest = create_contest(&db, &brand, ContestStatus::Live).await;
    let product = create_product(&db, &brand, Some(&contest), 0).await;
    let application = create_application(
        &db,
        &contest,
        &creator,
        Some(&product),
        ApplicationStatus::Pending,
    )
    .await;

    let err = application_db::approve_application(&db, &actor(&brand), application.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::OutOfStock));

    let application = application_db::get_application(&db, application.id)
        .await
        .unwrap();
    assert_eq!(application.status, ApplicationStatus::Pending);
    let product = product_db::get_product(&db, product.id).await.unwrap();
    assert_eq!(product.stock_quantity, 0);
}

#[tokio::test]
async fn approval_without_product_fails() {
    let db = setup_db().await;
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let contest = create_contest(&db, &brand, ContestStatus::Live).await;
    let application =
        create_application(&db, &contest, &creator, None, ApplicationStatus::Pending).await;

    let err = application_db::approve_application(&db, &actor(&brand), application.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::MissingProduct));
}

#[tokio::test]
async fn only_the_contest_owner_decides() {
    let db = setup_db().await;
    let brand = create_user(&db, Roles::Brand).await;
    let stranger = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let contest = create_contest(&db, &brand, ContestStatus::Live).await;
    let product = create_product(&db, &brand, Some(&contest), 2).await;
    let application = create_application(
        &db,
        &contest,
        &creator,
        Some(&product),
        ApplicationStatus::Pending,
    )
    .await;

    let err = application_db::approve_application(&db, &actor(&stranger), application.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    let err = application_db::reject_application(&db, &actor(&creator), application.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn rejection_is_idempotent_and_cannot_undo_approval() {
    let db = setup_db().await;
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let contest = create_contest(&db, &brand, ContestStatus::Live).await;
    let product = create_product(&db, &brand, Some(&contest), 2).await;
    let pending = create_application(
        &db,
        &contest,
        &creator,
        Some(&product),
        ApplicationStatus::Pending,
    )
    .await;

    let first = application_db::reject_application(
        &db,
        &actor(&brand),
        pending.id,
        Some("Not a fit this time".into()),
    )
    .await
    .unwrap();
    assert!(first.newly_rejected);
    assert_eq!(first.application.notes, "Not a fit this time");

    let second = application_db::reject_application(&db, &actor(&brand), pending.id, None)
        .await
        .unwrap();
    assert!(!second.newly_rejected);

    let other_creator = create_user(&db, Roles::Creator).await;
    let approved = create_application(
        &db,
        &contest,
        &other_creator,
        Some(&product),
        ApplicationStatus::Approved,
    )
    .await;
    let err = application_db::reject_application(&db, &actor(&brand), approved.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));
}

#[tokio::test]
async fn update_can_bind_product_and_approve() {
    let db = setup_db().await;
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let contest = create_contest(&db, &brand, ContestStatus::Live).await;
    let product = create_product(&db, &brand, Some(&contest), 4).await;
    let application =
        create_application(&db, &contest, &creator, None, ApplicationStatus::Pending).await;

    let outcome = application_db::update_application(
        &db,
        &actor(&brand),
        application.id,
        UpdateApplication {
            status: Some(ApplicationStatus::Approved),
            notes: Some("Ship the blue one".into()),
            product_id: Some(product.id),
        },
    )
    .await
    .unwrap();

    let updated = outcome.application();
    assert_eq!(updated.status, ApplicationStatus::Approved);
    assert_eq!(updated.product_id, Some(product.id));
    assert_eq!(updated.notes, "Ship the blue one");
    let product = product_db::get_product(&db, product.id).await.unwrap();
    assert_eq!(product.stock_quantity, 3);

    let err = application_db::update_application(
        &db,
        &actor(&brand),
        application.id,
        UpdateApplication {
            status: Some(ApplicationStatus::Pending),
            notes: None,
            product_id: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));
}

#[tokio::test]
async fn failed_update_approval_keeps_previous_binding() {
    let db = setup_db().await;
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let contest = create_contest(&db, &brand, ContestStatus::Live).await;
    let empty = create_product(&db, &brand, Some(&contest), 0).await;
    let application =
        create_application(&db, &contest, &creator, None, ApplicationStatus::Pending).await;

    let err = application_db::update_application(
        &db,
        &actor(&brand),
        application.id,
        UpdateApplication {
            status: Some(ApplicationStatus::Approved),
            notes: Some("changed".into()),
            product_id: Some(empty.id),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::OutOfStock));

    let stored = application_db::get_application(&db, application.id)
        .await
        .unwrap();
    assert_eq!(stored.status, ApplicationStatus::Pending);
    assert_eq!(stored.product_id, None);
    assert_eq!(stored.notes, application.notes);
    let empty = product_db::get_product(&db, empty.id).await.unwrap();
    assert_eq!(empty.stock_quantity, 0);
}

#[tokio::test]
async fn failed_update_approval_keeps_notes_without_product() {
    let db = setup_db().await;
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let contest = create_contest(&db, &brand, ContestStatus::Live).await;
    let application =
        create_application(&db, &contest, &creator, None, ApplicationStatus::Pending).await;

    let err = application_db::update_application(
        &db,
        &actor(&brand),
        application.id,
        UpdateApplication {
            status: Some(ApplicationStatus::Approved),
            notes: Some("approve please".into()),
            product_id: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::MissingProduct));

    let stored = application_db::get_application(&db, application.id)
        .await
        .unwrap();
    assert_eq!(stored.status, ApplicationStatus::Pending);
    assert_eq!(stored.notes, application.notes);
}

#[tokio::test]
async fn concurrent_approvals_share_the_last_unit() {
    let db = setup_db().await;
    let brand = create_user(&db, Roles::Brand).await;
    let contest = create_contest(&db, &brand, ContestStatus::Live).await;
    let product = create_product(&db, &brand, Some(&contest), 1).await;

    let first_creator = create_user(&db, Roles::Creator).await;
    let second_creator = create_user(&db, Roles::Creator).await;
    let first = create_application(
        &db,
        &contest,
        &first_creator,
        Some(&product),
        ApplicationStatus::Pending,
    )
    .await;
    let second = create_application(
        &db,
        &contest,
        &second_creator,
        Some(&product),
        ApplicationStatus::Pending,
    )
    .await;

    let owner = actor(&brand);
    let (a, b) = tokio::join!(
        application_db::approve_application(&db, &owner, first.id),
        application_db::approve_application(&db, &owner, second.id),
    );

    let outcomes = [a, b];
    let approved = outcomes.iter().filter(|r| r.is_ok()).count();
    let out_of_stock = outcomes
        .iter()
        .filter(|r| matches!(r, Err(AppError::OutOfStock)))
        .count();
    assert_eq!(approved, 1);
    assert_eq!(out_of_stock, 1);

    let product = product_db::get_product(&db, product.id).await.unwrap();
    assert_eq!(product.stock_quantity, 0);
    assert_eq!(product.status, ProductStatus::AllPicked);
}

#[tokio::test]
async fn batch_approve_reports_per_id() {
    let db = setup_db().await;
    let admin = create_user(&db, Roles::Admin).await;
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let contest = create_contest(&db, &brand, ContestStatus::Live).await;
    let product = create_product(&db, &brand, Some(&contest), 5).await;
    let application = create_application(
        &db,
        &contest,
        &creator,
        Some(&product),
        ApplicationStatus::Pending,
    )
    .await;
    let missing = Uuid::new_v4();

    let err = application_db::batch_approve(&db, &actor(&brand), &[application.id])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::RoleNotAllowed { required: Roles::Admin }));

    let results = application_db::batch_approve(&db, &actor(&admin), &[application.id, missing])
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].result.is_ok());
    assert!(matches!(results[1].result, Err(AppError::NotFound(_))));
}
