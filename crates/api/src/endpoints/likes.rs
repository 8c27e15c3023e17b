//! Like endpoints.
//!
//! `POST` likes the subject and `DELETE` removes the like. Both are
//! idempotent per session and respond with the subject's current count.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use murmur_common::AppResult;
use murmur_core::{Liked, SubjectKind};

use crate::{
    extractors::Session,
    middleware::AppState,
    response::{Created, UnlikeResponse},
};

async fn like_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Session(session): Session,
) -> AppResult<Created<Liked>> {
    let liked = state
        .like_service
        .like(SubjectKind::Post, &post_id, &session)
        .await?;
    Ok(Created(liked))
}

async fn unlike_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Session(session): Session,
) -> AppResult<Json<UnlikeResponse>> {
    let unliked = state
        .like_service
        .unlike(SubjectKind::Post, &post_id, &session)
        .await?;
    Ok(Json(UnlikeResponse::new(unliked.likes_count)))
}

async fn like_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Session(session): Session,
) -> AppResult<Created<Liked>> {
    let liked = state
        .like_service
        .like(SubjectKind::Comment, &comment_id, &session)
        .await?;
    Ok(Created(liked))
}

async fn unlike_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Session(session): Session,
) -> AppResult<Json<UnlikeResponse>> {
    let unliked = state
        .like_service
        .unlike(SubjectKind::Comment, &comment_id, &session)
        .await?;
    Ok(Json(UnlikeResponse::new(unliked.likes_count)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts/{id}/like", post(like_post).delete(unlike_post))
        .route(
            "/comments/{id}/like",
            post(like_comment).delete(unlike_comment),
        )
}
