//! Post repository.

use std::sync::Arc;

use crate::db_err;
use crate::entities::{Post, post};
use murmur_common::{AppResult, RatingSummary};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Self::find_by_id_in(self.db.as_ref(), id).await
    }

    /// Find a post by ID on the given connection.
    pub async fn find_by_id_in<C: ConnectionTrait>(
        conn: &C,
        id: &str,
    ) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id).one(conn).await.map_err(db_err)
    }

    /// Find a post by ID and hold a row lock on it until the surrounding
    /// transaction ends. Serializes aggregate recomputation per post.
    pub async fn find_for_update_in<C: ConnectionTrait>(
        conn: &C,
        id: &str,
    ) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .lock_exclusive()
            .one(conn)
            .await
            .map_err(db_err)
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model.insert(self.db.as_ref()).await.map_err(db_err)
    }

    /// All posts, newest first. Ties on `created_at` are broken by ID.
    pub async fn find_all_recent(&self) -> AppResult<Vec<post::Model>> {
        Post::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Overwrite the denormalized rating aggregate of a post.
    pub async fn set_rating_summary_in<C: ConnectionTrait>(
        conn: &C,
        id: &str,
        summary: RatingSummary,
    ) -> AppResult<()> {
        Post::update_many()
            .col_expr(
                post::Column::AverageRating,
                Expr::value(summary.average_rating),
            )
            .col_expr(post::Column::RatingCount, Expr::value(summary.rating_count))
            .filter(post::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    /// Overwrite the denormalized like count of a post.
    pub async fn set_likes_count_in<C: ConnectionTrait>(
        conn: &C,
        id: &str,
        likes_count: i32,
    ) -> AppResult<()> {
        Post::update_many()
            .col_expr(post::Column::LikesCount, Expr::value(likes_count))
            .filter(post::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
