//! Post endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use murmur_common::AppResult;
use murmur_core::CreatePostInput;
use murmur_db::entities::post;

use crate::{extractors::ValidatedJson, middleware::AppState, response::Created};

/// The feed, newest first.
async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<post::Model>>> {
    Ok(Json(state.post_service.list().await?))
}

/// Create a post.
async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreatePostInput>,
) -> AppResult<Created<post::Model>> {
    Ok(Created(state.post_service.create(input).await?))
}

/// Show a single post.
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<post::Model>> {
    Ok(Json(state.post_service.get(&id).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list).post(create))
        .route("/posts/{id}", get(show))
}
