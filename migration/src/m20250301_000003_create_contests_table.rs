use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `contests` table and its columns.
#[derive(DeriveIden)]
enum Contests {
    Table,
    Id,
    BrandId,
    Title,
    Description,
    Brief,
    Inspiration,
    Rules,
    Prize,
    Deadline,
    Status,
    Region,
    Language,
    MaxEntries,
    IsFeatured,
    ViewCount,
    ThumbnailUrl,
    WinnerSubmissionId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contests::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Contests::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Contests::BrandId).uuid().not_null())
                    .col(ColumnDef::new(Contests::Title).string().not_null())
                    .col(ColumnDef::new(Contests::Description).text().not_null())
                    .col(ColumnDef::new(Contests::Brief).text().not_null())
                    .col(
                        ColumnDef::new(Contests::Inspiration)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Contests::Rules).text().not_null().default(""))
                    .col(ColumnDef::new(Contests::Prize).double().not_null())
                    .col(
                        ColumnDef::new(Contests::Deadline)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // upcoming | live | closed | judging | completed
                    .col(
                        ColumnDef::new(Contests::Status)
                            .string()
                            .not_null()
                            .default("upcoming"),
                    )
                    .col(ColumnDef::new(Contests::Region).string().not_null().default(""))
                    .col(
                        ColumnDef::new(Contests::Language)
                            .string()
                            .not_null()
                            .default("English"),
                    )
                    .col(ColumnDef::new(Contests::MaxEntries).integer().null())
                    .col(
                        ColumnDef::new(Contests::IsFeatured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Contests::ViewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Contests::ThumbnailUrl).text().null())
                    // No FK: submissions reference contests, so this would be circular.
                    .col(ColumnDef::new(Contests::WinnerSubmissionId).uuid().null())
                    .col(
                        ColumnDef::new(Contests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contests_brand_id")
                            .from(Contests::Table, Contests::BrandId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contests::Table).to_owned())
            .await
    }
}
