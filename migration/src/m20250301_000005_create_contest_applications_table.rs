use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `contest_applications` table and its columns.
#[derive(DeriveIden)]
enum ContestApplications {
    Table,
    Id,
    ContestId,
    CreatorId,
    Status,
    TermsAccepted,
    Notes,
    FullName,
    ShippingAddressLine1,
    ShippingCity,
    ShippingState,
    ShippingPostal,
    ShippingCountry,
    ProductId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Contests {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContestApplications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContestApplications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContestApplications::ContestId).uuid().not_null())
                    .col(ColumnDef::new(ContestApplications::CreatorId).uuid().not_null())
                    // pending | approved | rejected
                    .col(
                        ColumnDef::new(ContestApplications::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(ContestApplications::TermsAccepted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ContestApplications::Notes)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(ContestApplications::FullName).string().null())
                    .col(
                        ColumnDef::new(ContestApplications::ShippingAddressLine1)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(ContestApplications::ShippingCity).string().null())
                    .col(ColumnDef::new(ContestApplications::ShippingState).string().null())
                    .col(ColumnDef::new(ContestApplications::ShippingPostal).string().null())
                    .col(ColumnDef::new(ContestApplications::ShippingCountry).string().null())
                    .col(ColumnDef::new(ContestApplications::ProductId).uuid().null())
                    .col(
                        ColumnDef::new(ContestApplications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContestApplications::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contest_applications_contest_id")
                            .from(ContestApplications::Table, ContestApplications::ContestId)
                            .to(Contests::Table, Contests::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contest_applications_creator_id")
                            .from(ContestApplications::Table, ContestApplications::CreatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contest_applications_product_id")
                            .from(ContestApplications::Table, ContestApplications::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContestApplications::Table).to_owned())
            .await
    }
}
