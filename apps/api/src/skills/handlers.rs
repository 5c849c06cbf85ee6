//! Axum route handlers for the Skills API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::errors::AppError;
use crate::models::project::ProjectRecord;
use crate::skills::extraction::ExtractionOutcome;
use crate::skills::gap::{summarize, GapSummary, SkillGapAnalysis};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub version: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGapRequest {
    #[serde(default)]
    pub present_skills: Vec<String>,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct SkillGapResponse {
    pub analysis: SkillGapAnalysis,
    pub summary: GapSummary,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub projects: Vec<ProjectRecord>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/roles
///
/// Lists the taxonomy version and every role key it defines.
pub async fn handle_list_roles(State(state): State<AppState>) -> Json<RolesResponse> {
    let taxonomy = state.analyzer.taxonomy();
    Json(RolesResponse {
        version: taxonomy.version.clone(),
        roles: taxonomy.role_keys().into_iter().map(str::to_string).collect(),
    })
}

/// POST /api/v1/skills/gap
pub async fn handle_skill_gap(
    State(state): State<AppState>,
    payload: Result<Json<SkillGapRequest>, JsonRejection>,
) -> Result<Json<SkillGapResponse>, AppError> {
    let Json(request) = payload?;
    if request.role.trim().is_empty() {
        return Err(AppError::Validation("role cannot be empty".to_string()));
    }

    let analysis = state.analyzer.analyze(&request.present_skills, &request.role)?;
    let summary = summarize(&analysis);

    Ok(Json(SkillGapResponse { analysis, summary }))
}

/// POST /api/v1/skills/extract
///
/// Runs the extraction fan-out over the given projects. Outstanding tasks are
/// cancelled if the request is dropped.
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ExtractionOutcome>, AppError> {
    let Json(request) = payload?;

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();
    let outcome = state.extractor.extract(&request.projects, &cancel).await;

    Ok(Json(outcome))
}
