//! API endpoints.

mod comments;
mod likes;
mod posts;
mod ratings;
mod site_rating;

use axum::{Router, middleware::from_fn};
use murmur_common::{AppError, AppResult};

use crate::middleware::{AppState, log_requests};

/// Create the API router.
///
/// Routes use full paths so that `/posts/{id}` and its sub-resources share
/// one parameter name.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(posts::router())
        .merge(comments::router())
        .merge(ratings::router())
        .merge(likes::router())
        .merge(site_rating::router())
        .fallback(not_found)
        .layer(from_fn(log_requests))
}

async fn not_found() -> AppResult<()> {
    Err(AppError::NotFound("Not found".to_string()))
}
