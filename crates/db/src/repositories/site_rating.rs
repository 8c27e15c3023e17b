//! Site rating repository.

use std::sync::Arc;

use crate::db_err;
use crate::entities::{SiteRating, site_rating};
use murmur_common::AppResult;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    sea_query::{Expr, OnConflict},
};

/// Site rating repository for database operations.
#[derive(Clone)]
pub struct SiteRatingRepository {
    db: Arc<DatabaseConnection>,
}

impl SiteRatingRepository {
    /// Create a new site rating repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the site rating of a session.
    pub async fn find_by_session(
        &self,
        user_session: &str,
    ) -> AppResult<Option<site_rating::Model>> {
        SiteRating::find()
            .filter(site_rating::Column::UserSession.eq(user_session))
            .one(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Insert a site rating, or replace the value if the session already
    /// rated. Returns the number of rows written.
    pub async fn upsert(&self, model: site_rating::ActiveModel) -> AppResult<u64> {
        SiteRating::insert(model)
            .on_conflict(
                OnConflict::column(site_rating::Column::UserSession)
                    .update_column(site_rating::Column::Rating)
                    .value(site_rating::Column::UpdatedAt, Expr::current_timestamp())
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Every star value recorded for the site.
    pub async fn all_values(&self) -> AppResult<Vec<i32>> {
        let ratings = SiteRating::find()
            .all(self.db.as_ref())
            .await
            .map_err(db_err)?;

        Ok(ratings.into_iter().map(|r| r.rating).collect())
    }
}
