//! Comment endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use murmur_common::AppResult;
use murmur_core::CreateCommentInput;
use murmur_db::entities::comment;

use crate::{extractors::ValidatedJson, middleware::AppState, response::Created};

async fn list(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> AppResult<Json<Vec<comment::Model>>> {
    Ok(Json(state.comment_service.list_by_post(&post_id).await?))
}

async fn create(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    ValidatedJson(input): ValidatedJson<CreateCommentInput>,
) -> AppResult<Created<comment::Model>> {
    Ok(Created(state.comment_service.create(&post_id, input).await?))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/posts/{id}/comments", get(list).post(create))
}
