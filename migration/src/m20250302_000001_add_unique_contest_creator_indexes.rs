use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum ContestApplications {
    Table,
    ContestId,
    CreatorId,
}

#[derive(DeriveIden)]
enum Submissions {
    Table,
    ContestId,
    CreatorId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One application per creator per contest.
        manager
            .create_index(
                Index::create()
                    .name("idx_contest_applications_contest_creator_unique")
                    .table(ContestApplications::Table)
                    .col(ContestApplications::ContestId)
                    .col(ContestApplications::CreatorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One submission per creator per contest.
        manager
            .create_index(
                Index::create()
                    .name("idx_submissions_contest_creator_unique")
                    .table(Submissions::Table)
                    .col(Submissions::ContestId)
                    .col(Submissions::CreatorId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_submissions_contest_creator_unique")
                    .table(Submissions::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_contest_applications_contest_creator_unique")
                    .table(ContestApplications::Table)
                    .to_owned(),
            )
            .await
    }
}
