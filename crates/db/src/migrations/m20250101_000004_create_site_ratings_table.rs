//! Create site ratings table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SiteRatings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SiteRatings::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SiteRatings::Rating).integer().not_null())
                    .col(
                        ColumnDef::new(SiteRatings::UserSession)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SiteRatings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(SiteRatings::UpdatedAt).timestamp_with_time_zone())
                    .check(Expr::col(SiteRatings::Rating).between(1, 5))
                    .to_owned(),
            )
            .await?;

        // Unique index: user_session - one site rating per session
        manager
            .create_index(
                Index::create()
                    .name("idx_site_ratings_user_session")
                    .table(SiteRatings::Table)
                    .col(SiteRatings::UserSession)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SiteRatings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SiteRatings {
    Table,
    Id,
    Rating,
    UserSession,
    CreatedAt,
    UpdatedAt,
}
