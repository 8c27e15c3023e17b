//! Comment repository.

use std::sync::Arc;

use crate::db_err;
use crate::entities::{Comment, comment};
use murmur_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comment::Model>> {
        Self::find_by_id_in(self.db.as_ref(), id).await
    }

    /// Find a comment by ID on the given connection.
    pub async fn find_by_id_in<C: ConnectionTrait>(
        conn: &C,
        id: &str,
    ) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id).one(conn).await.map_err(db_err)
    }

    /// Find a comment by ID and hold a row lock on it until the surrounding
    /// transaction ends. Serializes aggregate recomputation per comment.
    pub async fn find_for_update_in<C: ConnectionTrait>(
        conn: &C,
        id: &str,
    ) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .lock_exclusive()
            .one(conn)
            .await
            .map_err(db_err)
    }

    /// Create a new comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model.insert(self.db.as_ref()).await.map_err(db_err)
    }

    /// Comments on a post, newest first.
    pub async fn find_by_post(&self, post_id: &str) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Overwrite the denormalized like count of a comment.
    pub async fn set_likes_count_in<C: ConnectionTrait>(
        conn: &C,
        id: &str,
        likes_count: i32,
    ) -> AppResult<()> {
        Comment::update_many()
            .col_expr(comment::Column::LikesCount, Expr::value(likes_count))
            .filter(comment::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
