//! Database entities.

pub mod comment;
pub mod comment_like;
pub mod post;
pub mod post_like;
pub mod post_rating;
pub mod site_rating;

pub use comment::Entity as Comment;
pub use comment_like::Entity as CommentLike;
pub use post::Entity as Post;
pub use post_like::Entity as PostLike;
pub use post_rating::Entity as PostRating;
pub use site_rating::Entity as SiteRating;
