pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_table;
mod m20250301_000002_create_profile_tables;
mod m20250301_000003_create_contests_table;
mod m20250301_000004_create_products_table;
mod m20250301_000005_create_contest_applications_table;
mod m20250301_000006_create_submissions_table;
mod m20250301_000007_create_videos_table;
mod m20250301_000008_create_notifications_table;
mod m20250302_000001_add_unique_contest_creator_indexes;
mod m20250302_000002_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_table::Migration),
            Box::new(m20250301_000002_create_profile_tables::Migration),
            Box::new(m20250301_000003_create_contests_table::Migration),
            Box::new(m20250301_000004_create_products_table::Migration),
            Box::new(m20250301_000005_create_contest_applications_table::Migration),
            Box::new(m20250301_000006_create_submissions_table::Migration),
            Box::new(m20250301_000007_create_videos_table::Migration),
            Box::new(m20250301_000008_create_notifications_table::Migration),
            Box::new(m20250302_000001_add_unique_contest_creator_indexes::Migration),
            Box::new(m20250302_000002_add_indexes::Migration),
        ]
    }
}
