//! Post rating engine.
//!
//! Each session holds at most one rating per post. Recording a rating
//! upserts that row and then recomputes the post's `average_rating` and
//! `rating_count` from every rating row, all inside one transaction that
//! also holds a row lock on the post. The aggregate is never adjusted
//! incrementally, so it cannot drift from the rows.

use std::sync::Arc;

use chrono::Utc;
use murmur_common::{
    AppError, AppResult, IdGenerator, RatingSummary, SessionId, is_valid_id,
    rating::{MAX_RATING, MIN_RATING},
};
use murmur_db::{
    entities::post_rating,
    repositories::{PostRatingRepository, PostRepository},
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

use crate::db_err;

/// A star rating, used for both posts and the site.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct RateInput {
    #[validate(range(
        min = MIN_RATING,
        max = MAX_RATING,
        message = "Rating must be between 1 and 5"
    ))]
    pub rating: i32,
}

/// Rating service for posts.
#[derive(Clone)]
pub struct RatingService {
    db: Arc<DatabaseConnection>,
    rating_repo: PostRatingRepository,
    id_gen: IdGenerator,
}

impl RatingService {
    /// Create a new rating service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            rating_repo: PostRatingRepository::new(db.clone()),
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Record a session's rating of a post and refresh the post aggregate.
    ///
    /// Rating the same post again replaces the earlier value.
    pub async fn record(
        &self,
        post_id: &str,
        session: &SessionId,
        input: RateInput,
    ) -> AppResult<post_rating::Model> {
        input.validate()?;
        if !is_valid_id(post_id) {
            return Err(AppError::PostNotFound(post_id.to_string()));
        }

        let txn = self.db.begin().await.map_err(db_err)?;

        if PostRepository::find_for_update_in(&txn, post_id)
            .await?
            .is_none()
        {
            return Err(AppError::PostNotFound(post_id.to_string()));
        }

        let model = post_rating::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post_id.to_string()),
            rating: Set(input.rating),
            user_session: Set(session.as_str().to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        PostRatingRepository::upsert_in(&txn, model).await?;

        let rating =
            PostRatingRepository::find_by_post_and_session_in(&txn, post_id, session.as_str())
                .await?
                .ok_or_else(|| AppError::Internal("rating missing after upsert".to_string()))?;

        let values = PostRatingRepository::values_for_post_in(&txn, post_id).await?;
        let summary = RatingSummary::from_values(&values);
        PostRepository::set_rating_summary_in(&txn, post_id, summary).await?;

        txn.commit().await.map_err(db_err)?;

        info!(post_id = %post_id, rating = input.rating, "Recorded post rating");
        debug!(
            post_id = %post_id,
            average = %summary.scaled(),
            count = summary.rating_count,
            "Recomputed post rating aggregate"
        );

        Ok(rating)
    }

    /// The rating a session gave a post.
    pub async fn get_for_session(
        &self,
        post_id: &str,
        session: &SessionId,
    ) -> AppResult<post_rating::Model> {
        if !is_valid_id(post_id) {
            return Err(AppError::NotFound("Rating not found".to_string()));
        }
        self.rating_repo
            .find_by_post_and_session(post_id, session.as_str())
            .await?
            .ok_or_else(|| AppError::NotFound("Rating not found".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use murmur_db::entities::post;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    const POST_ID: &str = "01arz3ndektsv4rrffq69g5fav";
    const MISSING_ID: &str = "01arz3ndektsv4rrffq69g5fb0";

    fn create_test_post(id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            content: "hello".to_string(),
            gif_url: None,
            created_at: Utc::now().into(),
            likes_count: 0,
            average_rating: 0,
            rating_count: 0,
        }
    }

    fn create_test_rating(post_id: &str, session: &str, rating: i32) -> post_rating::Model {
        post_rating::Model {
            id: format!("r-{session}"),
            post_id: post_id.to_string(),
            rating,
            user_session: session.to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    const fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn session(raw: &str) -> SessionId {
        SessionId::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_record_rating_recomputes_aggregate() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_post(POST_ID)]])
            .append_query_results([[create_test_rating(POST_ID, "b", 3)]])
            .append_query_results([[
                create_test_rating(POST_ID, "a", 5),
                create_test_rating(POST_ID, "b", 3),
            ]])
            .append_exec_results([exec(1), exec(1)])
            .into_connection();
        let db = Arc::new(db);

        let service = RatingService::new(db.clone());
        let rating = service
            .record(POST_ID, &session("b"), RateInput { rating: 3 })
            .await
            .unwrap();
        assert_eq!(rating.rating, 3);
        assert_eq!(rating.user_session, "b");
        drop(service);

        let conn = Arc::try_unwrap(db).ok().unwrap();
        let log = format!("{:?}", conn.into_transaction_log());
        assert!(log.contains("FOR UPDATE"));
        assert!(log.contains("ON CONFLICT"));
        // mean(5, 3) * 20 = 80
        assert!(log.contains("Int(Some(80))"));
        assert!(log.contains("Int(Some(2))"));
    }

    /// Values written by the aggregate `UPDATE`: `(average_rating, rating_count)`.
    fn written_summary(log: &str) -> (i32, i32) {
        let update = &log[log.rfind("average_rating").unwrap()..];
        let values = &update[update.find("Values([").unwrap()..];
        let mut ints = values
            .split("Int(Some(")
            .skip(1)
            .map(|v| v.split(')').next().unwrap().parse::<i32>().unwrap());
        (ints.next().unwrap(), ints.next().unwrap())
    }

    #[tokio::test]
    async fn test_record_rating_aggregate_tracks_every_sequence() {
        let sequences: [&[i32]; 8] = [
            &[5],
            &[5, 3],
            &[1, 1, 2],
            &[2, 2, 3],
            &[1, 2, 3, 4, 5],
            &[4, 4, 4, 5],
            &[1, 1, 1, 2, 2, 2, 2, 2],
            &[5, 5, 5, 5, 5, 5, 5, 5, 5, 1],
        ];

        for values in sequences {
            let own = *values.last().unwrap();
            let rows: Vec<post_rating::Model> = values
                .iter()
                .enumerate()
                .map(|(i, v)| create_test_rating(POST_ID, &format!("s{i}"), *v))
                .collect();
            let db = Arc::new(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[create_test_post(POST_ID)]])
                    .append_query_results([[rows[rows.len() - 1].clone()]])
                    .append_query_results([rows])
                    .append_exec_results([exec(1), exec(1)])
                    .into_connection(),
            );

            let service = RatingService::new(db.clone());
            let session_name = format!("s{}", values.len() - 1);
            service
                .record(POST_ID, &session(&session_name), RateInput { rating: own })
                .await
                .unwrap();
            drop(service);

            let conn = Arc::try_unwrap(db).ok().unwrap();
            let log = format!("{:?}", conn.into_transaction_log());
            let (average, count) = written_summary(&log);

            let mean = f64::from(values.iter().sum::<i32>()) / values.len() as f64;
            let reference = (mean * 20.0).round() as i32;
            assert_eq!(count, values.len() as i32, "count for {values:?}");
            assert!(
                (average - reference).abs() <= 1,
                "average {average} for {values:?}, expected about {reference}"
            );
            assert!((0..=100).contains(&average));
        }
    }

    #[tokio::test]
    async fn test_record_rating_malformed_post_id() {
        // No query results: reaching the database would fail the test.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = RatingService::new(Arc::new(db));

        let result = service
            .record("missing\0id", &session("a"), RateInput { rating: 4 })
            .await;
        assert!(matches!(result, Err(AppError::PostNotFound(_))));

        let result = service.get_for_session("nope", &session("a")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_record_rating_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();

        let service = RatingService::new(Arc::new(db));
        let result = service
            .record(MISSING_ID, &session("a"), RateInput { rating: 4 })
            .await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_record_rating_out_of_range() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = RatingService::new(Arc::new(db));

        for rating in [0, 6, -1] {
            let result = service
                .record(POST_ID, &session("a"), RateInput { rating })
                .await;
            match result {
                Err(AppError::Validation { field, message }) => {
                    assert_eq!(field, "rating");
                    assert_eq!(message, "Rating must be between 1 and 5");
                }
                other => panic!("Expected Validation error, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_get_for_session_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post_rating::Model>::new()])
            .into_connection();

        let service = RatingService::new(Arc::new(db));
        let result = service.get_for_session(POST_ID, &session("a")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
