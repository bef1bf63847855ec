use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::*;
use uuid::Uuid;

use crate::auth::authorization::verify_product_owner;
use crate::error::{AppError, is_unique_violation};
use crate::models::contests;
use crate::models::products::{
    self, CreateProduct, ProductStatus, UpdateProduct, derive_status,
};
use crate::models::users::{Actor, Roles};

/// Insert a new product owned by the calling brand. Status starts from the
/// stock level.
pub async fn insert_product(
    db: &DatabaseConnection,
    actor: &Actor,
    input: CreateProduct,
) -> Result<products::Model, AppError> {
    if actor.role != Roles::Brand {
        return Err(AppError::RoleNotAllowed {
            required: Roles::Brand,
        });
    }
    input.validate()?;
    let brand_id = actor.id;

    if let Some(contest_id) = input.contest_id {
        ensure_contest_owned_by(db, contest_id, brand_id).await?;
    }

    let now = Utc::now();
    let sku = input.sku.trim().to_string();
    let new_product = products::ActiveModel {
        id: Set(Uuid::new_v4()),
        brand_id: Set(brand_id),
        contest_id: Set(input.contest_id),
        name: Set(input.name),
        sku: Set(sku.clone()),
        description: Set(input.description),
        price: Set(input.price),
        stock_quantity: Set(input.stock_quantity),
        status: Set(derive_status(input.stock_quantity, ProductStatus::Available)),
        image_url: Set(input.image_url),
        created_at: Set(now),
        updated_at: Set(now),
    };

    new_product.insert(db).await.map_err(|e| {
        if is_unique_violation(&e) {
            AppError::DuplicateSku(sku)
        } else {
            e.into()
        }
    })
}

/// Fetch a single product by ID.
pub async fn get_product<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<products::Model, AppError> {
    products::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Product", id))
}

/// A brand's products that can currently be picked.
pub async fn list_available_for_brand(
    db: &DatabaseConnection,
    brand_id: Uuid,
) -> Result<Vec<products::Model>, DbErr> {
    products::Entity::find()
        .filter(products::Column::BrandId.eq(brand_id))
        .filter(products::Column::Status.eq(ProductStatus::Available))
        .order_by_desc(products::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn list_for_contest(
    db: &DatabaseConnection,
    contest_id: Uuid,
) -> Result<Vec<products::Model>, DbErr> {
    products::Entity::find()
        .filter(products::Column::ContestId.eq(contest_id))
        .order_by_asc(products::Column::Name)
        .all(db)
        .await
}

/// Edit descriptive fields. Stock only moves through the stock operations.
pub async fn update_product(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
    input: UpdateProduct,
) -> Result<products::Model, AppError> {
    let product = get_product(db, id).await?;
    verify_product_owner(actor, &product)?;

    if matches!(input.price, Some(p) if p < 0.0) {
        return Err(AppError::validation("Price cannot be negative"));
    }
    if let Some(contest_id) = input.contest_id {
        ensure_contest_owned_by(db, contest_id, product.brand_id).await?;
    }

    let mut active: products::ActiveModel = product.into();
    if let Some(name) = input.name {
        active.name = Set(name);
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    if let Some(price) = input.price {
        active.price = Set(price);
    }
    if let Some(image_url) = input.image_url {
        active.image_url = Set(Some(image_url));
    }
    if let Some(contest_id) = input.contest_id {
        active.contest_id = Set(Some(contest_id));
    }
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}

/// Archive or unarchive. Unarchiving picks the status the stock implies.
pub async fn set_archived(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
    archived: bool,
) -> Result<products::Model, AppError> {
    let product = get_product(db, id).await?;
    verify_product_owner(actor, &product)?;

    let status = match (archived, product.stock_quantity > 0) {
        (true, _) => ProductStatus::Archived,
        (false, true) => ProductStatus::Available,
        (false, false) => ProductStatus::AllPicked,
    };
    if status == product.status {
        return Ok(product);
    }

    let mut active: products::ActiveModel = product.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

/// Take `quantity` units out of stock.
///
/// The decrement is a single conditional `UPDATE` so two concurrent
/// reductions can never drive stock below zero.
pub async fn reduce_stock(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
    quantity: i32,
) -> Result<products::Model, AppError> {
    if quantity <= 0 {
        return Err(AppError::InvalidQuantity);
    }

    let txn = db.begin().await?;
    let product = get_product(&txn, id).await?;
    verify_product_owner(actor, &product)?;

    let res = products::Entity::update_many()
        .col_expr(
            products::Column::StockQuantity,
            Expr::col(products::Column::StockQuantity).sub(quantity),
        )
        .col_expr(products::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(products::Column::Id.eq(id))
        .filter(products::Column::StockQuantity.gte(quantity))
        .exec(&txn)
        .await?;

    if res.rows_affected == 0 {
        // Re-read so the error reports what is actually there now.
        let current = get_product(&txn, id).await?;
        return Err(AppError::InsufficientStock {
            available: current.stock_quantity,
            requested: quantity,
        });
    }

    let product = rederive_status(&txn, id).await?;
    txn.commit().await?;

    tracing::info!(
        product_id = %id,
        quantity,
        stock = product.stock_quantity,
        "Stock reduced"
    );
    Ok(product)
}

/// Put `quantity` units back into stock.
pub async fn increase_stock(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
    quantity: i32,
) -> Result<products::Model, AppError> {
    if quantity <= 0 {
        return Err(AppError::InvalidQuantity);
    }

    let txn = db.begin().await?;
    let product = get_product(&txn, id).await?;
    verify_product_owner(actor, &product)?;

    products::Entity::update_many()
        .col_expr(
            products::Column::StockQuantity,
            Expr::col(products::Column::StockQuantity).add(quantity),
        )
        .col_expr(products::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(products::Column::Id.eq(id))
        .exec(&txn)
        .await?;

    let product = rederive_status(&txn, id).await?;
    txn.commit().await?;

    tracing::info!(
        product_id = %id,
        quantity,
        stock = product.stock_quantity,
        "Stock increased"
    );
    Ok(product)
}

/// Take exactly one unit if any is left. Returns `false` when the product
/// was already empty; the caller's transaction is left untouched then.
pub async fn decrement_one<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, DbErr> {
    let res = products::Entity::update_many()
        .col_expr(
            products::Column::StockQuantity,
            Expr::col(products::Column::StockQuantity).sub(1),
        )
        .col_expr(products::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(products::Column::Id.eq(id))
        .filter(products::Column::StockQuantity.gt(0))
        .exec(db)
        .await?;
    Ok(res.rows_affected == 1)
}

/// Reload the product and persist the status its stock implies.
pub async fn rederive_status<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<products::Model, AppError> {
    let product = get_product(db, id).await?;
    let status = derive_status(product.stock_quantity, product.status);
    if status == product.status {
        return Ok(product);
    }

    let mut active: products::ActiveModel = product.into();
    active.status = Set(status);
    Ok(active.update(db).await?)
}

async fn ensure_contest_owned_by(
    db: &DatabaseConnection,
    contest_id: Uuid,
    brand_id: Uuid,
) -> Result<(), AppError> {
    let contest = contests::Entity::find_by_id(contest_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Contest", contest_id))?;
    if contest.brand_id != brand_id {
        return Err(AppError::Forbidden(
            "Products can only be attached to your own contests".into(),
        ));
    }
    Ok(())
}
