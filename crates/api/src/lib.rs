//! HTTP API layer for murmur.
//!
//! - **Endpoints**: posts, comments, post and site ratings, likes
//! - **Extractors**: the anonymous session header and validated JSON bodies
//! - **Middleware**: application state and request logging
//!
//! Built on Axum 0.8. Every route here is mounted under `/api` by the server.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
