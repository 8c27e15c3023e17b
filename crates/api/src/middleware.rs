//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;
use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use murmur_core::{CommentService, LikeService, PostService, RatingService, SiteRatingService};
use murmur_db::repositories::{CommentRepository, PostRepository, SiteRatingRepository};
use sea_orm::DatabaseConnection;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub post_service: PostService,
    pub comment_service: CommentService,
    pub rating_service: RatingService,
    pub site_rating_service: SiteRatingService,
    pub like_service: LikeService,
}

impl AppState {
    /// Wire every service to one shared connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let post_repo = PostRepository::new(Arc::clone(&db));

        Self {
            post_service: PostService::new(post_repo.clone()),
            comment_service: CommentService::new(CommentRepository::new(Arc::clone(&db)), post_repo),
            rating_service: RatingService::new(Arc::clone(&db)),
            site_rating_service: SiteRatingService::new(SiteRatingRepository::new(Arc::clone(&db))),
            like_service: LikeService::new(db),
        }
    }
}

/// Log method, path, status and latency of every API request.
pub async fn log_requests(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    if status.is_server_error() {
        tracing::warn!(%method, %path, status = status.as_u16(), elapsed_ms, "API request failed");
    } else {
        tracing::info!(%method, %path, status = status.as_u16(), elapsed_ms, "API request");
    }

    response
}
