//! Site rating endpoints.

use axum::{Json, Router, extract::State, routing::get};
use murmur_common::{AppResult, RatingSummary};
use murmur_core::RateInput;
use murmur_db::entities::site_rating;

use crate::{
    extractors::{Session, ValidatedJson},
    middleware::AppState,
    response::Created,
};

async fn summary(State(state): State<AppState>) -> AppResult<Json<RatingSummary>> {
    Ok(Json(state.site_rating_service.summary().await?))
}

async fn rate(
    State(state): State<AppState>,
    Session(session): Session,
    ValidatedJson(input): ValidatedJson<RateInput>,
) -> AppResult<Created<site_rating::Model>> {
    Ok(Created(state.site_rating_service.record(&session, input).await?))
}

async fn mine(
    State(state): State<AppState>,
    Session(session): Session,
) -> AppResult<Json<site_rating::Model>> {
    Ok(Json(state.site_rating_service.get_for_session(&session).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/site-rating", get(summary).post(rate))
        .route("/site-rating/mine", get(mine))
}
