use axum::{extract::rejection::JsonRejection, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::project::ProjectRecord;
use crate::portfolio::scoring::{score_portfolio, PortfolioScoreResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioScoreRequest {
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
    #[serde(default)]
    pub has_profile_readme: bool,
    /// Reference time for recency; defaults to the current time.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

/// POST /api/v1/portfolio/score
pub async fn handle_score_portfolio(
    payload: Result<Json<PortfolioScoreRequest>, JsonRejection>,
) -> Result<Json<PortfolioScoreResult>, AppError> {
    let Json(request) = payload?;
    let now = request.now.unwrap_or_else(Utc::now);

    Ok(Json(score_portfolio(
        &request.projects,
        request.has_profile_readme,
        now,
    )))
}
