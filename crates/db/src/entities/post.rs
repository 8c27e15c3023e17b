//! Post entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Post body, at most 280 characters
    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Attached GIF URL
    #[sea_orm(nullable)]
    pub gif_url: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    /// Like count (denormalized from `post_likes`)
    #[sea_orm(default_value = 0)]
    pub likes_count: i32,

    /// Mean rating x 20 (denormalized from `post_ratings`)
    #[sea_orm(default_value = 0)]
    pub average_rating: i32,

    /// Rating count (denormalized from `post_ratings`)
    #[sea_orm(default_value = 0)]
    pub rating_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,

    #[sea_orm(has_many = "super::post_like::Entity")]
    Likes,

    #[sea_orm(has_many = "super::post_rating::Entity")]
    Ratings,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::post_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl Related<super::post_rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
