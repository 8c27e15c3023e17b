//! Create post and comment like tables migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_posts_table::Posts;
use super::m20250101_000002_create_comments_table::Comments;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PostLikes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PostLikes::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PostLikes::PostId).string_len(32).not_null())
                    .col(ColumnDef::new(PostLikes::UserSession).string_len(128).not_null())
                    .col(
                        ColumnDef::new(PostLikes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_likes_post")
                            .from(PostLikes::Table, PostLikes::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (post_id, user_session) - one like per session per post
        manager
            .create_index(
                Index::create()
                    .name("idx_post_likes_post_session")
                    .table(PostLikes::Table)
                    .col(PostLikes::PostId)
                    .col(PostLikes::UserSession)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CommentLikes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CommentLikes::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CommentLikes::CommentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommentLikes::UserSession)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommentLikes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_likes_comment")
                            .from(CommentLikes::Table, CommentLikes::CommentId)
                            .to(Comments::Table, Comments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (comment_id, user_session) - one like per session per comment
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_likes_comment_session")
                    .table(CommentLikes::Table)
                    .col(CommentLikes::CommentId)
                    .col(CommentLikes::UserSession)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommentLikes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PostLikes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PostLikes {
    Table,
    Id,
    PostId,
    UserSession,
    CreatedAt,
}

#[derive(Iden)]
enum CommentLikes {
    Table,
    Id,
    CommentId,
    UserSession,
    CreatedAt,
}
