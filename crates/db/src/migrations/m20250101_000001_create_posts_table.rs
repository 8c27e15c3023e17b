//! Create posts table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Posts::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Posts::Content).text().not_null())
                    .col(ColumnDef::new(Posts::GifUrl).string_len(2048))
                    .col(
                        ColumnDef::new(Posts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Posts::LikesCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Posts::AverageRating).integer().not_null().default(0))
                    .col(ColumnDef::new(Posts::RatingCount).integer().not_null().default(0))
                    .to_owned(),
            )
            .await?;

        // Index: created_at (for the reverse-chronological feed)
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_created_at")
                    .table(Posts::Table)
                    .col(Posts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Posts {
    Table,
    Id,
    Content,
    GifUrl,
    CreatedAt,
    LikesCount,
    AverageRating,
    RatingCount,
}
