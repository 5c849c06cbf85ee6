use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::recommendations::engine::ProjectRecommendation;
use crate::recommendations::filters::{filter_and_sort, FilterState};
use crate::skills::gap::SkillGapAnalysis;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default)]
    pub present_skills: Vec<String>,
    pub role: String,
    #[serde(default)]
    pub filters: FilterState,
    /// Overrides the natural direction of `filters.sortBy`.
    #[serde(default)]
    pub ascending: Option<bool>,
    /// Merge live-fetched templates when a live source is configured.
    #[serde(default)]
    pub live: bool,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub analysis: SkillGapAnalysis,
    pub recommendations: Vec<ProjectRecommendation>,
}

/// POST /api/v1/recommendations
///
/// Gap analysis → (optional live merge) → ranking → filter → sort.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let Json(request) = payload?;
    if request.role.trim().is_empty() {
        return Err(AppError::Validation("role cannot be empty".to_string()));
    }

    let analysis = state.analyzer.analyze(&request.present_skills, &request.role)?;

    let ranked = if request.live {
        let category = state
            .analyzer
            .taxonomy()
            .get(&analysis.role)
            .and_then(|tiers| tiers.category);
        state.engine.generate_with_live(&analysis, category).await
    } else {
        state.engine.generate(&analysis)
    };

    let recommendations = filter_and_sort(&ranked, &request.filters, request.ascending);
    info!(
        "Recommendations for {}: {} ranked, {} after filters",
        analysis.role,
        ranked.len(),
        recommendations.len()
    );

    Ok(Json(RecommendationResponse {
        analysis,
        recommendations,
    }))
}
