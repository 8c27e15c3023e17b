//! Post rating endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use murmur_common::AppResult;
use murmur_core::RateInput;
use murmur_db::entities::post_rating;

use crate::{
    extractors::{Session, ValidatedJson},
    middleware::AppState,
    response::Created,
};

/// Rate a post. Rating again replaces the session's earlier rating.
async fn rate(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Session(session): Session,
    ValidatedJson(input): ValidatedJson<RateInput>,
) -> AppResult<Created<post_rating::Model>> {
    let rating = state
        .rating_service
        .record(&post_id, &session, input)
        .await?;
    Ok(Created(rating))
}

/// The calling session's rating of a post.
async fn mine(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Session(session): Session,
) -> AppResult<Json<post_rating::Model>> {
    let rating = state
        .rating_service
        .get_for_session(&post_id, &session)
        .await?;
    Ok(Json(rating))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/posts/{id}/rating", post(rate).get(mine))
}
