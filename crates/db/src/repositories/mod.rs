//! Repositories.
//!
//! Each repository wraps a shared connection for standalone queries. The
//! associated `*_in` functions accept any [`sea_orm::ConnectionTrait`] so the
//! engine services can compose them inside one transaction.

mod comment;
mod comment_like;
mod post;
mod post_like;
mod post_rating;
mod site_rating;

pub use comment::CommentRepository;
pub use comment_like::CommentLikeRepository;
pub use post::PostRepository;
pub use post_like::PostLikeRepository;
pub use post_rating::PostRatingRepository;
pub use site_rating::SiteRatingRepository;
