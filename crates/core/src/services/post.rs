//! Post service.

use chrono::Utc;
use murmur_common::{AppError, AppResult, IdGenerator, is_valid_id};
use murmur_db::{entities::post, repositories::PostRepository};
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::validation::{validate_content, validate_gif_url};

/// Input for creating a post.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    #[validate(custom(function = "validate_content"))]
    pub content: String,

    #[validate(custom(function = "validate_gif_url"))]
    #[serde(default)]
    pub gif_url: Option<String>,
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(post_repo: PostRepository) -> Self {
        Self {
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a post with zeroed aggregates.
    pub async fn create(&self, input: CreatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            content: Set(input.content),
            gif_url: Set(input.gif_url),
            created_at: Set(Utc::now().into()),
            likes_count: Set(0),
            average_rating: Set(0),
            rating_count: Set(0),
        };

        let post = self.post_repo.create(model).await?;
        info!(post_id = %post.id, has_gif = post.gif_url.is_some(), "Created post");
        Ok(post)
    }

    /// Get a post by ID.
    pub async fn get(&self, id: &str) -> AppResult<post::Model> {
        if !is_valid_id(id) {
            return Err(AppError::PostNotFound(id.to_string()));
        }
        self.post_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))
    }

    /// The feed: every post, newest first.
    pub async fn list(&self) -> AppResult<Vec<post::Model>> {
        self.post_repo.find_all_recent().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_post(id: &str, content: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            content: content.to_string(),
            gif_url: None,
            created_at: Utc::now().into(),
            likes_count: 0,
            average_rating: 0,
            rating_count: 0,
        }
    }

    fn service(db: MockDatabase) -> PostService {
        PostService::new(PostRepository::new(Arc::new(db.into_connection())))
    }

    #[tokio::test]
    async fn test_create_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_post("p1", "hello")]]);

        let post = service(db)
            .create(CreatePostInput {
                content: "hello".to_string(),
                gif_url: None,
            })
            .await
            .unwrap();

        assert_eq!(post.content, "hello");
        assert_eq!(post.likes_count, 0);
        assert_eq!(post.rating_count, 0);
    }

    #[tokio::test]
    async fn test_create_post_too_long() {
        let db = MockDatabase::new(DatabaseBackend::Postgres);

        let result = service(db)
            .create(CreatePostInput {
                content: "a".repeat(281),
                gif_url: None,
            })
            .await;

        match result {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "content"),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_post_blank() {
        let db = MockDatabase::new(DatabaseBackend::Postgres);

        let result = service(db)
            .create(CreatePostInput {
                content: "   ".to_string(),
                gif_url: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_post_rejects_bad_gif_url() {
        let db = MockDatabase::new(DatabaseBackend::Postgres);

        let result = service(db)
            .create(CreatePostInput {
                content: "look".to_string(),
                gif_url: Some("ftp://example.com/a.gif".to_string()),
            })
            .await;

        match result {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "gifUrl"),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()]);

        let result = service(db).get("01arz3ndektsv4rrffq69g5fb0").await;
        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_get_malformed_id_skips_database() {
        // No query results: reaching the database would fail the test.
        let db = MockDatabase::new(DatabaseBackend::Postgres);

        let result = service(db).get("missing\0id").await;
        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_post_rejects_nul() {
        let db = MockDatabase::new(DatabaseBackend::Postgres);

        let result = service(db)
            .create(CreatePostInput {
                content: "a\u{0}b".to_string(),
                gif_url: None,
            })
            .await;

        match result {
            Err(AppError::Validation { field, message }) => {
                assert_eq!(field, "content");
                assert_eq!(message, "Content contains invalid characters");
            }
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_posts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[
            create_test_post("p2", "second"),
            create_test_post("p1", "first"),
        ]]);

        let posts = service(db).list().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, "p2");
    }
}
