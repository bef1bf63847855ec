use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum CreatorProfiles {
    Table,
    UserId,
    Bio,
    ShippingAddressLine1,
    ShippingAddressLine2,
    ShippingCity,
    ShippingState,
    ShippingPostalCode,
    ShippingCountry,
    ReceiveSmsNotifications,
    ExperienceLevel,
    PortfolioUrl,
    TotalEarnings,
    ContestWins,
    ContestParticipations,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BrandProfiles {
    Table,
    UserId,
    CompanyName,
    Bio,
    Country,
    ContactEmail,
    ContactPerson,
    ContactPhone,
    WebsiteUrl,
    IndustryType,
    ContestsCreated,
    TotalPrizeMoney,
    CreatedAt,
    UpdatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
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
                    .table(CreatorProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreatorProfiles::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CreatorProfiles::Bio)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(CreatorProfiles::ShippingAddressLine1).string().null())
                    .col(ColumnDef::new(CreatorProfiles::ShippingAddressLine2).string().null())
                    .col(ColumnDef::new(CreatorProfiles::ShippingCity).string().null())
                    .col(ColumnDef::new(CreatorProfiles::ShippingState).string().null())
                    .col(ColumnDef::new(CreatorProfiles::ShippingPostalCode).string().null())
                    .col(ColumnDef::new(CreatorProfiles::ShippingCountry).string().null())
                    .col(
                        ColumnDef::new(CreatorProfiles::ReceiveSmsNotifications)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CreatorProfiles::ExperienceLevel)
                            .string()
                            .not_null()
                            .default("beginner"),
                    )
                    .col(ColumnDef::new(CreatorProfiles::PortfolioUrl).string().null())
                    .col(
                        ColumnDef::new(CreatorProfiles::TotalEarnings)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(CreatorProfiles::ContestWins)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CreatorProfiles::ContestParticipations)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CreatorProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreatorProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_creator_profiles_user_id")
                            .from(CreatorProfiles::Table, CreatorProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BrandProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BrandProfiles::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BrandProfiles::CompanyName).string().not_null())
                    .col(
                        ColumnDef::new(BrandProfiles::Bio)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(BrandProfiles::Country).string().null())
                    .col(ColumnDef::new(BrandProfiles::ContactEmail).string().null())
                    .col(ColumnDef::new(BrandProfiles::ContactPerson).string().null())
                    .col(ColumnDef::new(BrandProfiles::ContactPhone).string().null())
                    .col(ColumnDef::new(BrandProfiles::WebsiteUrl).string().null())
                    .col(ColumnDef::new(BrandProfiles::IndustryType).string().null())
                    .col(
                        ColumnDef::new(BrandProfiles::ContestsCreated)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BrandProfiles::TotalPrizeMoney)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(BrandProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BrandProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_brand_profiles_user_id")
                            .from(BrandProfiles::Table, BrandProfiles::UserId)
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
            .drop_table(Table::drop().table(BrandProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CreatorProfiles::Table).to_owned())
            .await
    }
}
