//! Like engine for posts and comments.
//!
//! A like is a `(subject, session)` row; its presence means "liked". The
//! subject's `likes_count` is rewritten from the row count after every
//! transition, inside the same transaction that changed the row and that
//! holds a row lock on the subject. Liking twice or unliking something that
//! was never liked leaves the rows alone and still refreshes the count.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use murmur_common::{AppError, AppResult, IdGenerator, SessionId, is_valid_id};
use murmur_db::{
    entities::{comment_like, post_like},
    repositories::{CommentLikeRepository, CommentRepository, PostLikeRepository, PostRepository},
};
use sea_orm::{DatabaseConnection, DatabaseTransaction, Set, TransactionTrait};
use serde::Serialize;
use tracing::{debug, info};

use crate::db_err;

/// What a like applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectKind {
    Post,
    Comment,
}

impl SubjectKind {
    fn not_found(self, id: &str) -> AppError {
        match self {
            Self::Post => AppError::PostNotFound(id.to_string()),
            Self::Comment => AppError::CommentNotFound(id.to_string()),
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Post => f.write_str("post"),
            Self::Comment => f.write_str("comment"),
        }
    }
}

/// A like row. Serializes as the row itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Like {
    Post(post_like::Model),
    Comment(comment_like::Model),
}

/// The like row after liking, with the subject's refreshed count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Liked {
    #[serde(flatten)]
    pub like: Like,
    pub likes_count: i32,
}

/// Result of unliking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unliked {
    /// Whether a like row was actually removed.
    pub removed: bool,
    pub likes_count: i32,
}

fn count_to_i32(count: u64) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// Like service for posts and comments.
#[derive(Clone)]
pub struct LikeService {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Like a post or comment. Idempotent per session.
    pub async fn like(
        &self,
        kind: SubjectKind,
        subject_id: &str,
        session: &SessionId,
    ) -> AppResult<Liked> {
        if !is_valid_id(subject_id) {
            return Err(kind.not_found(subject_id));
        }

        let txn = self.db.begin().await.map_err(db_err)?;
        Self::lock_subject(&txn, kind, subject_id).await?;

        let (inserted, like) = self.insert_like(&txn, kind, subject_id, session).await?;
        let likes_count = Self::refresh_count(&txn, kind, subject_id).await?;

        txn.commit().await.map_err(db_err)?;

        Self::log_transition(kind, subject_id, "like", inserted, likes_count);
        Ok(Liked { like, likes_count })
    }

    /// Remove a session's like from a post or comment. Idempotent.
    pub async fn unlike(
        &self,
        kind: SubjectKind,
        subject_id: &str,
        session: &SessionId,
    ) -> AppResult<Unliked> {
        if !is_valid_id(subject_id) {
            return Err(kind.not_found(subject_id));
        }

        let txn = self.db.begin().await.map_err(db_err)?;
        Self::lock_subject(&txn, kind, subject_id).await?;

        let deleted = match kind {
            SubjectKind::Post => {
                PostLikeRepository::delete_by_post_and_session_in(
                    &txn,
                    subject_id,
                    session.as_str(),
                )
                .await?
            }
            SubjectKind::Comment => {
                CommentLikeRepository::delete_by_comment_and_session_in(
                    &txn,
                    subject_id,
                    session.as_str(),
                )
                .await?
            }
        };
        let likes_count = Self::refresh_count(&txn, kind, subject_id).await?;

        txn.commit().await.map_err(db_err)?;

        let removed = deleted > 0;
        Self::log_transition(kind, subject_id, "unlike", removed, likes_count);
        Ok(Unliked {
            removed,
            likes_count,
        })
    }

    /// Row-lock the subject, or fail with its not-found error.
    async fn lock_subject(
        txn: &DatabaseTransaction,
        kind: SubjectKind,
        subject_id: &str,
    ) -> AppResult<()> {
        let found = match kind {
            SubjectKind::Post => PostRepository::find_for_update_in(txn, subject_id)
                .await?
                .is_some(),
            SubjectKind::Comment => CommentRepository::find_for_update_in(txn, subject_id)
                .await?
                .is_some(),
        };
        if found {
            Ok(())
        } else {
            Err(kind.not_found(subject_id))
        }
    }

    /// Insert the like unless present. Returns whether a row was inserted
    /// and the session's like row.
    async fn insert_like(
        &self,
        txn: &DatabaseTransaction,
        kind: SubjectKind,
        subject_id: &str,
        session: &SessionId,
    ) -> AppResult<(bool, Like)> {
        let (inserted, like) = match kind {
            SubjectKind::Post => {
                let model = post_like::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    post_id: Set(subject_id.to_string()),
                    user_session: Set(session.as_str().to_string()),
                    created_at: Set(Utc::now().into()),
                };
                let inserted = PostLikeRepository::insert_if_absent_in(txn, model).await?;
                let like = PostLikeRepository::find_by_post_and_session_in(
                    txn,
                    subject_id,
                    session.as_str(),
                )
                .await?
                .map(Like::Post);
                (inserted, like)
            }
            SubjectKind::Comment => {
                let model = comment_like::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    comment_id: Set(subject_id.to_string()),
                    user_session: Set(session.as_str().to_string()),
                    created_at: Set(Utc::now().into()),
                };
                let inserted = CommentLikeRepository::insert_if_absent_in(txn, model).await?;
                let like = CommentLikeRepository::find_by_comment_and_session_in(
                    txn,
                    subject_id,
                    session.as_str(),
                )
                .await?
                .map(Like::Comment);
                (inserted, like)
            }
        };

        let like =
            like.ok_or_else(|| AppError::Internal("like missing after insert".to_string()))?;
        Ok((inserted > 0, like))
    }

    /// Recount the subject's like rows and write the count onto it.
    async fn refresh_count(
        txn: &DatabaseTransaction,
        kind: SubjectKind,
        subject_id: &str,
    ) -> AppResult<i32> {
        match kind {
            SubjectKind::Post => {
                let count =
                    count_to_i32(PostLikeRepository::count_by_post_in(txn, subject_id).await?);
                PostRepository::set_likes_count_in(txn, subject_id, count).await?;
                Ok(count)
            }
            SubjectKind::Comment => {
                let count = count_to_i32(
                    CommentLikeRepository::count_by_comment_in(txn, subject_id).await?,
                );
                CommentRepository::set_likes_count_in(txn, subject_id, count).await?;
                Ok(count)
            }
        }
    }

    fn log_transition(
        kind: SubjectKind,
        subject_id: &str,
        action: &'static str,
        changed: bool,
        likes_count: i32,
    ) {
        if changed {
            info!(subject = %kind, subject_id = %subject_id, action, likes_count, "Like state changed");
        } else {
            debug!(subject = %kind, subject_id = %subject_id, action, likes_count, "Like state unchanged");
        }
    }
}
