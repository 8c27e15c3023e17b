//! Comment service.

use chrono::Utc;
use murmur_common::{AppError, AppResult, IdGenerator, is_valid_id};
use murmur_db::{
    entities::comment,
    repositories::{CommentRepository, PostRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::validation::validate_content;

/// Input for creating a comment. The target post comes from the path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentInput {
    #[validate(custom(function = "validate_content"))]
    pub content: String,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(comment_repo: CommentRepository, post_repo: PostRepository) -> Self {
        Self {
            comment_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Comment on a post.
    pub async fn create(
        &self,
        post_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        if !is_valid_id(post_id) || self.post_repo.find_by_id(post_id).await?.is_none() {
            return Err(AppError::PostNotFound(post_id.to_string()));
        }

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post_id.to_string()),
            content: Set(input.content),
            created_at: Set(Utc::now().into()),
            likes_count: Set(0),
        };

        let comment = self.comment_repo.create(model).await?;
        info!(comment_id = %comment.id, post_id = %post_id, "Created comment");
        Ok(comment)
    }

    /// Comments on a post, newest first. Unknown posts have no comments.
    pub async fn list_by_post(&self, post_id: &str) -> AppResult<Vec<comment::Model>> {
        if !is_valid_id(post_id) {
            return Ok(Vec::new());
        }
        self.comment_repo.find_by_post(post_id).await
    }
}
