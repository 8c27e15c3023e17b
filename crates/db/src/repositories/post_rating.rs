//! Post rating repository.

use std::sync::Arc;

use crate::db_err;
use crate::entities::{PostRating, post_rating};
use murmur_common::AppResult;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    sea_query::{Expr, OnConflict},
};

/// Post rating repository for database operations.
#[derive(Clone)]
pub struct PostRatingRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRatingRepository {
    /// Create a new post rating repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the rating a session gave a post.
    pub async fn find_by_post_and_session(
        &self,
        post_id: &str,
        user_session: &str,
    ) -> AppResult<Option<post_rating::Model>> {
        Self::find_by_post_and_session_in(self.db.as_ref(), post_id, user_session).await
    }

    /// Find the rating a session gave a post on the given connection.
    pub async fn find_by_post_and_session_in<C: ConnectionTrait>(
        conn: &C,
        post_id: &str,
        user_session: &str,
    ) -> AppResult<Option<post_rating::Model>> {
        PostRating::find()
            .filter(post_rating::Column::PostId.eq(post_id))
            .filter(post_rating::Column::UserSession.eq(user_session))
            .one(conn)
            .await
            .map_err(db_err)
    }

    /// Insert a rating, or replace the value and stamp `updated_at` if the
    /// session already rated this post. Returns the number of rows written.
    pub async fn upsert_in<C: ConnectionTrait>(
        conn: &C,
        model: post_rating::ActiveModel,
    ) -> AppResult<u64> {
        PostRating::insert(model)
            .on_conflict(
                OnConflict::columns([
                    post_rating::Column::PostId,
                    post_rating::Column::UserSession,
                ])
                .update_column(post_rating::Column::Rating)
                .value(post_rating::Column::UpdatedAt, Expr::current_timestamp())
                .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(db_err)
    }

    /// Every star value recorded for a post.
    pub async fn values_for_post_in<C: ConnectionTrait>(
        conn: &C,
        post_id: &str,
    ) -> AppResult<Vec<i32>> {
        let ratings = PostRating::find()
            .filter(post_rating::Column::PostId.eq(post_id))
            .all(conn)
            .await
            .map_err(db_err)?;

        Ok(ratings.into_iter().map(|r| r.rating).collect())
    }
}
