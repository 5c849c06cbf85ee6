//! Portfolio scoring: category scores, weighted overall score, and letter rank.
//!
//! Pure: the caller supplies `now`, so identical input always yields identical output.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::project::ProjectRecord;
use crate::portfolio::feedback::{build_feedback, FeedbackBreakdown};

/// Complexity at or above which a project counts as a showcase piece.
const SHOWCASE_COMPLEXITY: f64 = 85.0;
const SHOWCASE_BONUS: f64 = 10.0;
const SHOWCASE_MIN_PROJECTS: usize = 2;

/// Each additional language keeps this fraction of the remaining headroom.
const DIVERSITY_DECAY: f64 = 0.75;

const PROFILE_README_BONUS: f64 = 15.0;

/// Description length (chars) → documentation points, evaluated top-down.
const DESCRIPTION_POINTS: &[(usize, f64)] = &[(100, 100.0), (30, 70.0), (1, 40.0), (0, 0.0)];

/// Days since the latest commit → consistency score, evaluated top-down.
const RECENCY_SCORES: &[(i64, f64)] = &[
    (7, 100.0),
    (30, 85.0),
    (90, 60.0),
    (180, 40.0),
    (365, 20.0),
];
const STALE_SCORE: f64 = 5.0;

/// Overall score → rank, evaluated top-down; the first cut point reached wins.
pub const RANK_TABLE: &[(u8, &str)] = &[
    (95, "S"),
    (90, "A+"),
    (80, "A"),
    (75, "A-"),
    (65, "B+"),
    (55, "B"),
    (50, "B-"),
    (40, "C+"),
    (0, "C"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioWeights {
    pub project_quality: f64,
    pub tech_diversity: f64,
    pub documentation: f64,
    pub consistency: f64,
}

impl Default for PortfolioWeights {
    fn default() -> Self {
        Self {
            project_quality: 0.35,
            tech_diversity: 0.20,
            documentation: 0.25,
            consistency: 0.20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioScoreResult {
    pub overall_score: u8,
    pub rank: String,
    pub project_quality_score: u8,
    pub tech_diversity_score: u8,
    pub documentation_score: u8,
    pub consistency_score: u8,
    /// Informational; not part of the overall weighting. `None` for an empty portfolio.
    pub professionalism_score: Option<u8>,
    pub has_profile_readme: bool,
    pub breakdown: FeedbackBreakdown,
}

/// Scores a set of projects as one portfolio.
pub fn score_portfolio(
    projects: &[ProjectRecord],
    has_profile_readme: bool,
    now: DateTime<Utc>,
) -> PortfolioScoreResult {
    score_portfolio_with_weights(projects, has_profile_readme, now, &PortfolioWeights::default())
}

pub fn score_portfolio_with_weights(
    projects: &[ProjectRecord],
    has_profile_readme: bool,
    now: DateTime<Utc>,
    weights: &PortfolioWeights,
) -> PortfolioScoreResult {
    if projects.is_empty() {
        return PortfolioScoreResult {
            overall_score: 0,
            rank: rank_for(0).to_string(),
            project_quality_score: 0,
            tech_diversity_score: 0,
            documentation_score: 0,
            consistency_score: 0,
            professionalism_score: None,
            has_profile_readme,
            breakdown: FeedbackBreakdown::empty_portfolio(),
        };
    }

    let quality = project_quality_score(projects);
    let diversity = tech_diversity_score(projects);
    let documentation = documentation_score(projects, has_profile_readme);
    let consistency = consistency_score(projects, now);

    let overall = to_score(
        weights.project_quality * quality as f64
            + weights.tech_diversity * diversity as f64
            + weights.documentation * documentation as f64
            + weights.consistency * consistency as f64,
    );

    let mut result = PortfolioScoreResult {
        overall_score: overall,
        rank: rank_for(overall).to_string(),
        project_quality_score: quality,
        tech_diversity_score: diversity,
        documentation_score: documentation,
        consistency_score: consistency,
        professionalism_score: Some(professionalism_score(projects, has_profile_readme)),
        has_profile_readme,
        breakdown: FeedbackBreakdown::default(),
    };
    result.breakdown = build_feedback(&result, distinct_languages(projects));
    result
}

fn to_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Looks up the rank for `overall` in `RANK_TABLE`.
pub fn rank_for(overall: u8) -> &'static str {
    RANK_TABLE
        .iter()
        .find(|(cut, _)| overall >= *cut)
        .map(|(_, rank)| *rank)
        .unwrap_or("C")
}

/// Mean complexity (missing counts as 0) plus a bonus for two or more showcase projects.
pub fn project_quality_score(projects: &[ProjectRecord]) -> u8 {
    if projects.is_empty() {
        return 0;
    }
    let total: f64 = projects
        .iter()
        .map(|p| p.complexity_score.unwrap_or(0.0).clamp(0.0, 100.0))
        .sum();
    let mean = total / projects.len() as f64;

    let showcase = projects
        .iter()
        .filter(|p| p.complexity_score.unwrap_or(0.0) >= SHOWCASE_COMPLEXITY)
        .count();
    let bonus = if showcase >= SHOWCASE_MIN_PROJECTS {
        SHOWCASE_BONUS
    } else {
        0.0
    };
    to_score(mean + bonus)
}

fn distinct_languages(projects: &[ProjectRecord]) -> usize {
    projects
        .iter()
        .flat_map(|p| p.languages.keys())
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

/// 100 × (1 − 0.75ⁿ) for n distinct languages: 1 → 25, 2 → 44, 3 → 58, 5 → 76.
pub fn tech_diversity_score(projects: &[ProjectRecord]) -> u8 {
    let languages = distinct_languages(projects) as i32;
    to_score(100.0 * (1.0 - DIVERSITY_DECAY.powi(languages)))
}

fn description_points(description: Option<&str>) -> f64 {
    let length = description.map(|d| d.trim().chars().count()).unwrap_or(0);
    DESCRIPTION_POINTS
        .iter()
        .find(|(min_len, _)| length >= *min_len)
        .map(|(_, points)| *points)
        .unwrap_or(0.0)
}

/// Mean description points plus a flat bonus for a profile README.
pub fn documentation_score(projects: &[ProjectRecord], has_profile_readme: bool) -> u8 {
    let mean = if projects.is_empty() {
        0.0
    } else {
        projects
            .iter()
            .map(|p| description_points(p.description.as_deref()))
            .sum::<f64>()
            / projects.len() as f64
    };
    let bonus = if has_profile_readme {
        PROFILE_README_BONUS
    } else {
        0.0
    };
    to_score(mean + bonus)
}

/// Step decay on days since the most recent commit across all projects.
/// No commit dates at all scores 0; commits dated after `now` count as today.
pub fn consistency_score(projects: &[ProjectRecord], now: DateTime<Utc>) -> u8 {
    let latest = match projects.iter().filter_map(|p| p.last_commit_date).max() {
        Some(date) => date,
        None => return 0,
    };
    let days = (now - latest).num_days().max(0);
    let score = RECENCY_SCORES
        .iter()
        .find(|(max_days, _)| days <= *max_days)
        .map(|(_, score)| *score)
        .unwrap_or(STALE_SCORE);
    to_score(score)
}

/// Profile README (40) + share of starred projects (30) + share of described projects (30).
pub fn professionalism_score(projects: &[ProjectRecord], has_profile_readme: bool) -> u8 {
    if projects.is_empty() {
        return 0;
    }
    let count = projects.len() as f64;
    let starred = projects.iter().filter(|p| p.stars > 0).count() as f64;
    let described = projects
        .iter()
        .filter(|p| !p.description_text().trim().is_empty())
        .count() as f64;
    let readme = if has_profile_readme { 40.0 } else { 0.0 };
    to_score(readme + 30.0 * starred / count + 30.0 * described / count)
}
