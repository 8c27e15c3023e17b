//! Business logic services.

#![allow(missing_docs)]

pub mod comment;
pub mod like;
pub mod post;
pub mod rating;
pub mod site_rating;

pub use comment::{CommentService, CreateCommentInput};
pub use like::{Like, LikeService, Liked, SubjectKind, Unliked};
pub use post::{CreatePostInput, PostService};
pub use rating::{RateInput, RatingService};
pub use site_rating::SiteRatingService;
