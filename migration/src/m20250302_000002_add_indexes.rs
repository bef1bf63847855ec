use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Contests {
    Table,
    BrandId,
    Status,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    BrandId,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    RecipientId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Videos {
    Table,
    CreatorId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Brand dashboards list their own contests.
        manager
            .create_index(
                Index::create()
                    .name("idx_contests_brand_id")
                    .table(Contests::Table)
                    .col(Contests::BrandId)
                    .to_owned(),
            )
            .await?;

        // Active/featured listings filter on status.
        manager
            .create_index(
                Index::create()
                    .name("idx_contests_status")
                    .table(Contests::Table)
                    .col(Contests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_brand_status")
                    .table(Products::Table)
                    .col(Products::BrandId)
                    .col(Products::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_created_at")
                    .table(Products::Table)
                    .col(Products::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Notification inbox, newest first.
        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_recipient_created")
                    .table(Notifications::Table)
                    .col(Notifications::RecipientId)
                    .col(Notifications::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_videos_creator_id")
                    .table(Videos::Table)
                    .col(Videos::CreatorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_contests_brand_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_contests_status").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_products_brand_status").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_products_created_at").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_notifications_recipient_created")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_videos_creator_id").to_owned())
            .await?;

        Ok(())
    }
}
