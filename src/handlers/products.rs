use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheConfig, CacheData, keys};
use crate::db::{contests as contest_db, products as product_db};
use crate::error::AppError;
use crate::models::products::{self, CreateProduct, SetArchived, StockAdjustment, UpdateProduct};

/// POST /api/products - brands add inventory.
pub async fn create_product(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    body: web::Json<CreateProduct>,
) -> Result<HttpResponse, AppError> {
    let product = product_db::insert_product(db.get_ref(), &user.actor(), body.into_inner()).await?;
    invalidate_brand_list(&cache, &product).await;
    Ok(HttpResponse::Created().json(product))
}

/// GET /api/products/{id}
pub async fn get_product(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let product = product_db::get_product(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// PUT /api/products/{id} - owning brand or admin.
pub async fn update_product(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProduct>,
) -> Result<HttpResponse, AppError> {
    let product = product_db::update_product(
        db.get_ref(),
        &user.actor(),
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    invalidate_brand_list(&cache, &product).await;
    Ok(HttpResponse::Ok().json(product))
}

/// POST /api/products/{id}/reduce-stock
pub async fn reduce_stock(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
    body: web::Json<StockAdjustment>,
) -> Result<HttpResponse, AppError> {
    let product =
        product_db::reduce_stock(db.get_ref(), &user.actor(), path.into_inner(), body.quantity)
            .await?;
    invalidate_brand_list(&cache, &product).await;
    Ok(HttpResponse::Ok().json(product))
}

/// POST /api/products/{id}/increase-stock
pub async fn increase_stock(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
    body: web::Json<StockAdjustment>,
) -> Result<HttpResponse, AppError> {
    let product =
        product_db::increase_stock(db.get_ref(), &user.actor(), path.into_inner(), body.quantity)
            .await?;
    invalidate_brand_list(&cache, &product).await;
    Ok(HttpResponse::Ok().json(product))
}

/// PUT /api/products/{id}/archive - `{"archived": bool}`.
pub async fn set_archived(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
    body: web::Json<SetArchived>,
) -> Result<HttpResponse, AppError> {
    let product =
        product_db::set_archived(db.get_ref(), &user.actor(), path.into_inner(), body.archived)
            .await?;
    invalidate_brand_list(&cache, &product).await;
    Ok(HttpResponse::Ok().json(product))
}

/// GET /api/brands/{brand_id}/products - pickable products, cached briefly.
pub async fn get_brand_products(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    config: web::Data<CacheConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let brand_id = path.into_inner();
    let products = cache
        .get_or_load(
            &keys::brand_products(&brand_id.to_string()),
            config.product_list_ttl,
            || async {
                product_db::list_available_for_brand(db.get_ref(), brand_id)
                    .await
                    .map_err(AppError::from)
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(products))
}

/// GET /api/contests/{id}/products - everything attached to a contest.
pub async fn get_contest_products(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let contest_id = path.into_inner();
    contest_db::get_contest(db.get_ref(), contest_id).await?;
    let products = product_db::list_for_contest(db.get_ref(), contest_id).await?;
    Ok(HttpResponse::Ok().json(products))
}

async fn invalidate_brand_list(cache: &CacheData, product: &products::Model) {
    cache
        .invalidate(&keys::brand_products(&product.brand_id.to_string()))
        .await;
}
