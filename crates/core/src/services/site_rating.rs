//! Site rating service.

use chrono::Utc;
use murmur_common::{AppError, AppResult, IdGenerator, RatingSummary, SessionId};
use murmur_db::{entities::site_rating, repositories::SiteRatingRepository};
use sea_orm::Set;
use tracing::{debug, info};
use validator::Validate;

use super::rating::RateInput;

/// Site-wide rating service. The aggregate is computed on every read.
#[derive(Clone)]
pub struct SiteRatingService {
    site_rating_repo: SiteRatingRepository,
    id_gen: IdGenerator,
}

impl SiteRatingService {
    /// Create a new site rating service.
    #[must_use]
    pub const fn new(site_rating_repo: SiteRatingRepository) -> Self {
        Self {
            site_rating_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Record a session's rating of the site, replacing any earlier one.
    pub async fn record(
        &self,
        session: &SessionId,
        input: RateInput,
    ) -> AppResult<site_rating::Model> {
        input.validate()?;

        let model = site_rating::ActiveModel {
            id: Set(self.id_gen.generate()),
            rating: Set(input.rating),
            user_session: Set(session.as_str().to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        self.site_rating_repo.upsert(model).await?;

        let rating = self
            .site_rating_repo
            .find_by_session(session.as_str())
            .await?
            .ok_or_else(|| AppError::Internal("site rating missing after upsert".to_string()))?;

        info!(rating = rating.rating, "Recorded site rating");
        Ok(rating)
    }

    /// Average and count over every site rating; zero when nobody rated.
    pub async fn summary(&self) -> AppResult<RatingSummary> {
        let values = self.site_rating_repo.all_values().await?;
        let summary = RatingSummary::from_values(&values);
        debug!(
            average = %summary.scaled(),
            count = summary.rating_count,
            "Computed site rating"
        );
        Ok(summary)
    }

    /// The site rating a session gave.
    pub async fn get_for_session(&self, session: &SessionId) -> AppResult<site_rating::Model> {
        self.site_rating_repo
            .find_by_session(session.as_str())
            .await?
            .ok_or_else(|| AppError::NotFound("Site rating not found".to_string()))
    }
}
