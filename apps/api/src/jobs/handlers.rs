use axum::{extract::rejection::JsonRejection, Json};
use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;
use crate::jobs::job_match::{score_job_match, JobMatchResult};
use crate::models::project::ProjectRecord;
use crate::skills::detection::required_skills_from_description;

/// Either an explicit skill list or job posting text; the list wins when both are sent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchRequest {
    #[serde(default)]
    pub required_skills: Option<Vec<String>>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
}

impl JobMatchRequest {
    fn required_skills(&self) -> Result<Vec<String>, AppError> {
        match (&self.required_skills, &self.job_description) {
            (Some(skills), _) => Ok(skills.clone()),
            (None, Some(text)) if !text.trim().is_empty() => {
                let skills = required_skills_from_description(text);
                debug!("Extracted {} required skills from job description", skills.len());
                Ok(skills)
            }
            _ => Err(AppError::Validation(
                "either requiredSkills or jobDescription is required".to_string(),
            )),
        }
    }
}

/// POST /api/v1/jobs/match
pub async fn handle_job_match(
    payload: Result<Json<JobMatchRequest>, JsonRejection>,
) -> Result<Json<JobMatchResult>, AppError> {
    let Json(request) = payload?;
    let required_skills = request.required_skills()?;

    Ok(Json(score_job_match(&required_skills, &request.projects)))
}
