//! Post like repository.

use crate::db_err;
use crate::entities::{PostLike, post_like};
use murmur_common::AppResult;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, sea_query::OnConflict,
};

/// Post like repository.
///
/// Likes are only ever written together with the post's denormalized
/// `likes_count`, so every operation takes the caller's transaction.
#[derive(Clone, Copy, Debug, Default)]
pub struct PostLikeRepository;

impl PostLikeRepository {
    /// Insert a like unless the session already likes the post.
    /// Returns the number of rows inserted (0 or 1).
    pub async fn insert_if_absent_in<C: ConnectionTrait>(
        conn: &C,
        model: post_like::ActiveModel,
    ) -> AppResult<u64> {
        PostLike::insert(model)
            .on_conflict(
                OnConflict::columns([post_like::Column::PostId, post_like::Column::UserSession])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(db_err)
    }

    /// Find the like a session left on a post.
    pub async fn find_by_post_and_session_in<C: ConnectionTrait>(
        conn: &C,
        post_id: &str,
        user_session: &str,
    ) -> AppResult<Option<post_like::Model>> {
        PostLike::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .filter(post_like::Column::UserSession.eq(user_session))
            .one(conn)
            .await
            .map_err(db_err)
    }

    /// Remove a session's like from a post. Returns the number of rows deleted.
    pub async fn delete_by_post_and_session_in<C: ConnectionTrait>(
        conn: &C,
        post_id: &str,
        user_session: &str,
    ) -> AppResult<u64> {
        let result = PostLike::delete_many()
            .filter(post_like::Column::PostId.eq(post_id))
            .filter(post_like::Column::UserSession.eq(user_session))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    /// Count likes on a post.
    pub async fn count_by_post_in<C: ConnectionTrait>(conn: &C, post_id: &str) -> AppResult<u64> {
        PostLike::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .count(conn)
            .await
            .map_err(db_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    #[tokio::test]
    async fn test_insert_if_absent_duplicate_is_noop() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let model = post_like::ActiveModel {
            id: Set("l1".to_string()),
            post_id: Set("p1".to_string()),
            user_session: Set("s1".to_string()),
            created_at: Set(Utc::now().into()),
        };

        let inserted = PostLikeRepository::insert_if_absent_in(&db, model)
            .await
            .unwrap();
        assert_eq!(inserted, 0);

        let sql = format!("{:?}", db.into_transaction_log());
        assert!(sql.contains("DO NOTHING"));
    }

    #[tokio::test]
    async fn test_delete_by_post_and_session() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let deleted = PostLikeRepository::delete_by_post_and_session_in(&db, "p1", "s1")
            .await
            .unwrap();
        assert_eq!(deleted, 1);
    }

    #[tokio::test]
    async fn test_count_by_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[maplit::btreemap! {
                "num_items" => sea_orm::Value::BigInt(Some(3)),
            }]])
            .into_connection();

        let count = PostLikeRepository::count_by_post_in(&db, "p1").await.unwrap();
        assert_eq!(count, 3);
    }
}
