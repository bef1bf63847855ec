//! Shared fixtures for the database-backed tests.
//!
//! Each test gets its own in-memory SQLite database with the full schema.
//! The pool holds a single connection, so an in-memory database survives for
//! the whole test and concurrent transactions run one after another.
#![allow(dead_code)]

use chrono::{Duration, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use uuid::Uuid;

use contest_backend::models::applications::{self, ApplicationStatus};
use contest_backend::models::contests::{self, ContestStatus};
use contest_backend::models::products::{self, ProductStatus};
use contest_backend::models::users::{self, Actor, Roles};

pub async fn setup_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_owned());
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn create_user(db: &DatabaseConnection, role: Roles) -> users::Model {
    let id = Uuid::new_v4();
    users::ActiveModel {
        id: Set(id),
        email: Set(format!("{id}@example.com")),
        first_name: Set(Some("Test".into())),
        last_name: Set(Some(role.as_str().into())),
        display_name: Set(None),
        avatar_url: Set(None),
        phone_number: Set(None),
        auth_provider: Set("google".into()),
        role: Set(role),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    }
    .insert(db)
    .await
    .expect("Failed to insert user")
}

pub fn actor(user: &users::Model) -> Actor {
    Actor::new(user.id, user.role)
}

pub async fn create_contest(
    db: &DatabaseConnection,
    brand: &users::Model,
    status: ContestStatus,
) -> contests::Model {
    let now = Utc::now();
    contests::ActiveModel {
        id: Set(Uuid::new_v4()),
        brand_id: Set(brand.id),
        title: Set("Summer unboxing".into()),
        description: Set("Film an unboxing".into()),
        brief: Set("Show the product in use".into()),
        inspiration: Set(String::new()),
        rules: Set(String::new()),
        prize: Set(500.0),
        deadline: Set(now + Duration::days(14)),
        status: Set(status),
        region: Set("global".into()),
        language: Set("English".into()),
        max_entries: Set(None),
        is_featured: Set(false),
        view_count: Set(0),
        thumbnail_url: Set(None),
        winner_submission_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert contest")
}

pub async fn create_product(
    db: &DatabaseConnection,
    brand: &users::Model,
    contest: Option<&contests::Model>,
    stock: i32,
) -> products::Model {
    let now = Utc::now();
    let id = Uuid::new_v4();
    products::ActiveModel {
        id: Set(id),
        brand_id: Set(brand.id),
        contest_id: Set(contest.map(|c| c.id)),
        name: Set("Sample tee".into()),
        sku: Set(format!("SKU-{id}")),
        description: Set(String::new()),
        price: Set(25.0),
        stock_quantity: Set(stock),
        status: Set(if stock > 0 {
            ProductStatus::Available
        } else {
            ProductStatus::AllPicked
        }),
        image_url: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert product")
}

pub async fn create_application(
    db: &DatabaseConnection,
    contest: &contests::Model,
    creator: &users::Model,
    product: Option<&products::Model>,
    status: ApplicationStatus,
) -> applications::Model {
    let now = Utc::now();
    applications::ActiveModel {
        id: Set(Uuid::new_v4()),
        contest_id: Set(contest.id),
        creator_id: Set(creator.id),
        status: Set(status),
        terms_accepted: Set(true),
        notes: Set(String::new()),
        full_name: Set(Some("Test Creator".into())),
        shipping_address_line1: Set(Some("1 Main St".into())),
        shipping_city: Set(Some("Lisbon".into())),
        shipping_state: Set(None),
        shipping_postal: Set(Some("1000-001".into())),
        shipping_country: Set(Some("PT".into())),
        product_id: Set(product.map(|p| p.id)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert application")
}
