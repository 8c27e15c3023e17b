//! Create post ratings table migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_posts_table::Posts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PostRatings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PostRatings::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PostRatings::PostId).string_len(32).not_null())
                    .col(ColumnDef::new(PostRatings::Rating).integer().not_null())
                    .col(
                        ColumnDef::new(PostRatings::UserSession)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PostRatings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(PostRatings::UpdatedAt).timestamp_with_time_zone())
                    .check(Expr::col(PostRatings::Rating).between(1, 5))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_ratings_post")
                            .from(PostRatings::Table, PostRatings::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (post_id, user_session) - one rating per session per post
        manager
            .create_index(
                Index::create()
                    .name("idx_post_ratings_post_session")
                    .table(PostRatings::Table)
                    .col(PostRatings::PostId)
                    .col(PostRatings::UserSession)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostRatings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PostRatings {
    Table,
    Id,
    PostId,
    Rating,
    UserSession,
    CreatedAt,
    UpdatedAt,
}
