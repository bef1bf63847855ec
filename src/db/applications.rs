use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::auth::authorization::{require_admin, verify_contest_owner};
use crate::db::products;
use crate::error::{AppError, is_unique_violation};
use crate::models::applications::{
    self, ApplicationStatus, ApprovalPlan, CreateApplication, UpdateApplication, check_rejection,
    plan_approval,
};
use crate::models::contests::{self, ContestStatus};
use crate::models::products as product_model;
use crate::models::users::{Actor, Roles};

/// Outcome of an approval, for the caller to decide what to publish.
#[derive(Debug, Clone)]
pub struct ApprovalResult {
    pub application: applications::Model,
    pub product: Option<product_model::Model>,
    /// `false` when the application was already approved and nothing changed.
    pub newly_approved: bool,
}

/// Outcome of a rejection; `newly_rejected` is `false` for a repeat.
#[derive(Debug, Clone)]
pub struct RejectionResult {
    pub application: applications::Model,
    pub newly_rejected: bool,
}

/// Per-id outcome of a batch action.
#[derive(Debug)]
pub struct BatchItem<T> {
    pub id: Uuid,
    pub result: Result<T, AppError>,
}

pub async fn get_application<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<applications::Model, AppError> {
    applications::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Application", id))
}

/// A creator applies to a live contest.
pub async fn create_application(
    db: &DatabaseConnection,
    actor: &Actor,
    contest_id: Uuid,
    input: CreateApplication,
) -> Result<applications::Model, AppError> {
    if actor.role != Roles::Creator {
        return Err(AppError::RoleNotAllowed {
            required: Roles::Creator,
        });
    }

    let contest = contests::Entity::find_by_id(contest_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Contest", contest_id))?;
    if contest.status != ContestStatus::Live {
        return Err(AppError::ContestNotLive(contest.status));
    }
    if !input.terms_accepted {
        return Err(AppError::TermsNotAccepted);
    }

    let address = input.shipping_address.unwrap_or_default();
    address.validate()?;

    if let Some(product_id) = input.product_id {
        let product = products::get_product(db, product_id).await?;
        if product.contest_id != Some(contest_id) {
            return Err(AppError::ProductNotInContest(product_id));
        }
    }

    if find_for_creator(db, contest_id, actor.id).await?.is_some() {
        return Err(AppError::DuplicateApplication);
    }

    let now = Utc::now();
    let new_application = applications::ActiveModel {
        id: Set(Uuid::new_v4()),
        contest_id: Set(contest_id),
        creator_id: Set(actor.id),
        status: Set(ApplicationStatus::Pending),
        terms_accepted: Set(true),
        notes: Set(input.notes),
        full_name: Set(input.full_name),
        shipping_address_line1: Set(address.line1),
        shipping_city: Set(address.city),
        shipping_state: Set(address.state),
        shipping_postal: Set(address.postal),
        shipping_country: Set(address.country),
        product_id: Set(input.product_id),
        created_at: Set(now),
        updated_at: Set(now),
    };

    // A racing duplicate passes the lookup above and trips the unique index.
    let application = new_application.insert(db).await.map_err(|e| {
        if is_unique_violation(&e) {
            AppError::DuplicateApplication
        } else {
            e.into()
        }
    })?;

    tracing::info!(
        application_id = %application.id,
        contest_id = %contest_id,
        creator_id = %actor.id,
        "Application created"
    );
    Ok(application)
}

/// Approve an application, taking one unit of its bound product.
///
/// Runs in one transaction holding the application row lock. The stock
/// decrement is conditional on `stock_quantity > 0`, so of two approvals
/// racing for the last unit exactly one wins and the other sees
/// `OutOfStock` with nothing written.
pub async fn approve_application(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
) -> Result<ApprovalResult, AppError> {
    let txn = db.begin().await?;
    let application = lock_application(&txn, id).await?;
    verify_contest_owner(&txn, application.contest_id, actor).await?;

    let result = approve_locked(&txn, application).await?;
    txn.commit().await?;

    log_approval(&result);
    Ok(result)
}

async fn lock_application(
    txn: &DatabaseTransaction,
    id: Uuid,
) -> Result<applications::Model, AppError> {
    applications::Entity::find_by_id(id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| AppError::not_found("Application", id))
}

/// Approval on an application already locked by `txn`. Nothing is
/// committed here; on error the caller drops the transaction.
async fn approve_locked(
    txn: &DatabaseTransaction,
    application: applications::Model,
) -> Result<ApprovalResult, AppError> {
    let bound = match application.product_id {
        Some(product_id) => Some(products::get_product(txn, product_id).await?),
        None => None,
    };

    let plan = plan_approval(
        application.status,
        bound.as_ref().map(|p| (p.id, p.stock_quantity)),
    )?;

    let product_id = match plan {
        ApprovalPlan::AlreadyApproved => {
            return Ok(ApprovalResult {
                application,
                product: bound,
                newly_approved: false,
            });
        }
        ApprovalPlan::Reserve(product_id) => product_id,
    };

    // The read above may be stale; this is the authoritative check.
    if !products::decrement_one(txn, product_id).await? {
        return Err(AppError::OutOfStock);
    }
    let product = products::rederive_status(txn, product_id).await?;

    let mut active: applications::ActiveModel = application.into();
    active.status = Set(ApplicationStatus::Approved);
    active.updated_at = Set(Utc::now());
    let application = active.update(txn).await?;

    Ok(ApprovalResult {
        application,
        product: Some(product),
        newly_approved: true,
    })
}

fn log_approval(result: &ApprovalResult) {
    if !result.newly_approved {
        return;
    }
    if let Some(product) = &result.product {
        tracing::info!(
            application_id = %result.application.id,
            product_id = %product.id,
            stock = product.stock_quantity,
            "Application approved"
        );
    }
}

/// Reject a pending application. Rejecting twice is a no-op.
pub async fn reject_application(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
    notes: Option<String>,
) -> Result<RejectionResult, AppError> {
    let txn = db.begin().await?;
    let application = lock_application(&txn, id).await?;
    verify_contest_owner(&txn, application.contest_id, actor).await?;

    let result = reject_locked(&txn, application, notes).await?;
    txn.commit().await?;

    if result.newly_rejected {
        tracing::info!(application_id = %result.application.id, "Application rejected");
    }
    Ok(result)
}

async fn reject_locked(
    txn: &DatabaseTransaction,
    application: applications::Model,
    notes: Option<String>,
) -> Result<RejectionResult, AppError> {
    if !check_rejection(application.status)? {
        return Ok(RejectionResult {
            application,
            newly_rejected: false,
        });
    }

    let mut active: applications::ActiveModel = application.into();
    active.status = Set(ApplicationStatus::Rejected);
    if let Some(notes) = notes {
        active.notes = Set(notes);
    }
    active.updated_at = Set(Utc::now());
    let application = active.update(txn).await?;

    Ok(RejectionResult {
        application,
        newly_rejected: true,
    })
}

/// What `update_application` did, so the handler can publish the right event.
#[derive(Debug, Clone)]
pub enum ApplicationUpdate {
    Approved(ApprovalResult),
    Rejected(RejectionResult),
    Edited(applications::Model),
}

impl ApplicationUpdate {
    pub fn application(&self) -> &applications::Model {
        match self {
            ApplicationUpdate::Approved(r) => &r.application,
            ApplicationUpdate::Rejected(r) => &r.application,
            ApplicationUpdate::Edited(a) => a,
        }
    }
}

/// Contest owner (or admin) edits an application: rebind the product or
/// change notes, and optionally move it to approved or rejected.
///
/// Edits and the status change share one transaction, so a failed approval
/// leaves the application exactly as it was.
pub async fn update_application(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
    input: UpdateApplication,
) -> Result<ApplicationUpdate, AppError> {
    let txn = db.begin().await?;
    let application = lock_application(&txn, id).await?;
    verify_contest_owner(&txn, application.contest_id, actor).await?;

    if input.status == Some(ApplicationStatus::Pending)
        && application.status != ApplicationStatus::Pending
    {
        return Err(AppError::InvalidTransition {
            from: application.status.as_str().to_string(),
            to: ApplicationStatus::Pending.as_str().to_string(),
        });
    }

    if let Some(product_id) = input.product_id {
        // The reserved unit belongs to the product bound at approval time.
        if application.status == ApplicationStatus::Approved {
            return Err(AppError::Validation(
                "The product of an approved application cannot be changed".into(),
            ));
        }
        let product = products::get_product(&txn, product_id).await?;
        if product.contest_id != Some(application.contest_id) {
            return Err(AppError::ProductNotInContest(product_id));
        }
    }

    // Rejection stores its own notes.
    let rejecting = input.status == Some(ApplicationStatus::Rejected);
    let notes = if rejecting { None } else { input.notes.clone() };
    let application = if input.product_id.is_some() || notes.is_some() {
        let mut active: applications::ActiveModel = application.into();
        if let Some(product_id) = input.product_id {
            active.product_id = Set(Some(product_id));
        }
        if let Some(notes) = notes {
            active.notes = Set(notes);
        }
        active.updated_at = Set(Utc::now());
        active.update(&txn).await?
    } else {
        application
    };

    let update = match input.status {
        Some(ApplicationStatus::Approved) => {
            ApplicationUpdate::Approved(approve_locked(&txn, application).await?)
        }
        Some(ApplicationStatus::Rejected) => {
            ApplicationUpdate::Rejected(reject_locked(&txn, application, input.notes).await?)
        }
        Some(ApplicationStatus::Pending) | None => ApplicationUpdate::Edited(application),
    };
    txn.commit().await?;

    match &update {
        ApplicationUpdate::Approved(result) => log_approval(result),
        ApplicationUpdate::Rejected(result) if result.newly_rejected => {
            tracing::info!(application_id = %result.application.id, "Application rejected");
        }
        _ => tracing::info!(application_id = %id, "Application updated"),
    }
    Ok(update)
}

/// Approve each id in its own transaction; one failure does not stop the rest.
pub async fn batch_approve(
    db: &DatabaseConnection,
    actor: &Actor,
    ids: &[Uuid],
) -> Result<Vec<BatchItem<ApprovalResult>>, AppError> {
    require_admin(actor)?;
    let mut results = Vec::with_capacity(ids.len());
    for &id in ids {
        let result = approve_application(db, actor, id).await;
        if let Err(e) = &result {
            tracing::warn!(application_id = %id, "Batch approval failed: {e}");
        }
        results.push(BatchItem { id, result });
    }
    Ok(results)
}

/// Reject each id in its own transaction.
pub async fn batch_reject(
    db: &DatabaseConnection,
    actor: &Actor,
    ids: &[Uuid],
) -> Result<Vec<BatchItem<RejectionResult>>, AppError> {
    require_admin(actor)?;
    let mut results = Vec::with_capacity(ids.len());
    for &id in ids {
        let result = reject_application(db, actor, id, None).await;
        if let Err(e) = &result {
            tracing::warn!(application_id = %id, "Batch rejection failed: {e}");
        }
        results.push(BatchItem { id, result });
    }
    Ok(results)
}

/// The creator's own application to a contest, if any.
pub async fn find_for_creator<C: ConnectionTrait>(
    db: &C,
    contest_id: Uuid,
    creator_id: Uuid,
) -> Result<Option<applications::Model>, DbErr> {
    applications::Entity::find()
        .filter(applications::Column::ContestId.eq(contest_id))
        .filter(applications::Column::CreatorId.eq(creator_id))
        .one(db)
        .await
}

/// All applications to a contest, for its owner.
pub async fn list_for_contest(
    db: &DatabaseConnection,
    actor: &Actor,
    contest_id: Uuid,
) -> Result<Vec<applications::Model>, AppError> {
    verify_contest_owner(db, contest_id, actor).await?;
    Ok(applications::Entity::find()
        .filter(applications::Column::ContestId.eq(contest_id))
        .order_by_desc(applications::Column::CreatedAt)
        .all(db)
        .await?)
}
