//! Comment like repository.

use crate::db_err;
use crate::entities::{CommentLike, comment_like};
use murmur_common::AppResult;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, sea_query::OnConflict,
};

/// Comment like repository.
///
/// Likes are only ever written together with the comment's denormalized
/// `likes_count`, so every operation takes the caller's transaction.
#[derive(Clone, Copy, Debug, Default)]
pub struct CommentLikeRepository;

impl CommentLikeRepository {
    /// Insert a like unless the session already likes the comment.
    /// Returns the number of rows inserted (0 or 1).
    pub async fn insert_if_absent_in<C: ConnectionTrait>(
        conn: &C,
        model: comment_like::ActiveModel,
    ) -> AppResult<u64> {
        CommentLike::insert(model)
            .on_conflict(
                OnConflict::columns([comment_like::Column::CommentId, comment_like::Column::UserSession])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(db_err)
    }

    /// Find the like a session left on a comment.
    pub async fn find_by_comment_and_session_in<C: ConnectionTrait>(
        conn: &C,
        comment_id: &str,
        user_session: &str,
    ) -> AppResult<Option<comment_like::Model>> {
        CommentLike::find()
            .filter(comment_like::Column::CommentId.eq(comment_id))
            .filter(comment_like::Column::UserSession.eq(user_session))
            .one(conn)
            .await
            .map_err(db_err)
    }

    /// Remove a session's like from a comment. Returns the number of rows deleted.
    pub async fn delete_by_comment_and_session_in<C: ConnectionTrait>(
        conn: &C,
        comment_id: &str,
        user_session: &str,
    ) -> AppResult<u64> {
        let result = CommentLike::delete_many()
            .filter(comment_like::Column::CommentId.eq(comment_id))
            .filter(comment_like::Column::UserSession.eq(user_session))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    /// Count likes on a comment.
    pub async fn count_by_comment_in<C: ConnectionTrait>(conn: &C, comment_id: &str) -> AppResult<u64> {
        CommentLike::find()
            .filter(comment_like::Column::CommentId.eq(comment_id))
            .count(conn)
            .await
            .map_err(db_err)
    }
}
