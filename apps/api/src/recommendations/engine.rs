//! Recommendation Engine: ranks catalog templates by the gaps they fill.
//!
//! Algorithm (per template):
//! 1. Tag each taught skill: fills_gap (with tier), reinforces, or new.
//! 2. priority_score = Σ gap points over fills_gap tags (essential 10, preferred 5, niceToHave 2).
//! 3. priority: ≥20 high, ≥10 medium, else low.
//! 4. A template filling no gap is forced to low with score 1.
//! Results are sorted by score descending; ties keep catalog order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::template::{Category, ProjectTemplate};
use crate::recommendations::catalog::ProjectCatalog;
use crate::recommendations::live::LiveTemplateSource;
use crate::skills::gap::{MissingSkills, SkillGapAnalysis};
use crate::skills::matcher::{matches_any, normalize};
use crate::skills::taxonomy::SkillTier;

const HIGH_PRIORITY_SCORE: u32 = 20;
const MEDIUM_PRIORITY_SCORE: u32 = 10;
const NO_GAP_SCORE: u32 = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SkillMatchType {
    New,
    FillsGap,
    Reinforces,
}

/// One taught skill tagged against the user's present/missing sets.
/// `priority` is set only for `FillsGap`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillMatch {
    pub skill: String,
    #[serde(rename = "type")]
    pub match_type: SkillMatchType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<SkillTier>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= HIGH_PRIORITY_SCORE => Priority::High,
            s if s >= MEDIUM_PRIORITY_SCORE => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecommendation {
    #[serde(flatten)]
    pub template: ProjectTemplate,
    pub priority_score: u32,
    pub priority: Priority,
    pub gaps_filled: Vec<String>,
    pub skill_matches: Vec<SkillMatch>,
    pub critical_gaps_addressed: usize,
}

/// Points a gap-filling skill contributes, by tier.
pub fn gap_points(tier: SkillTier) -> u32 {
    match tier {
        SkillTier::Essential => 10,
        SkillTier::Preferred => 5,
        SkillTier::NiceToHave => 2,
    }
}

/// Tags each taught skill. Gap tiers are checked before present skills,
/// highest tier first.
pub fn match_skills<S: AsRef<str>>(
    skills_taught: &[S],
    present_skills: &[String],
    missing_skills: &MissingSkills,
) -> Vec<SkillMatch> {
    skills_taught
        .iter()
        .map(|skill| {
            let skill = skill.as_ref();
            let gap_tier = SkillTier::ALL
                .into_iter()
                .find(|tier| matches_any(skill, missing_skills.tier(*tier)));

            let (match_type, priority) = match gap_tier {
                Some(tier) => (SkillMatchType::FillsGap, Some(tier)),
                None if matches_any(skill, present_skills) => (SkillMatchType::Reinforces, None),
                None => (SkillMatchType::New, None),
            };
            SkillMatch {
                skill: skill.to_string(),
                match_type,
                priority,
            }
        })
        .collect()
}

/// Scores one template against a gap analysis.
pub fn recommend(template: &ProjectTemplate, analysis: &SkillGapAnalysis) -> ProjectRecommendation {
    let skill_matches = match_skills(
        &template.skills_taught,
        &analysis.present_skills,
        &analysis.missing_skills,
    );

    let mut priority_score = 0;
    let mut gaps_filled = Vec::new();
    let mut critical_gaps_addressed = 0;
    for m in &skill_matches {
        if let (SkillMatchType::FillsGap, Some(tier)) = (m.match_type, m.priority) {
            priority_score += gap_points(tier);
            gaps_filled.push(m.skill.clone());
            if tier == SkillTier::Essential {
                critical_gaps_addressed += 1;
            }
        }
    }

    let priority = if gaps_filled.is_empty() {
        priority_score = NO_GAP_SCORE;
        Priority::Low
    } else {
        Priority::from_score(priority_score)
    };

    ProjectRecommendation {
        template: template.clone(),
        priority_score,
        priority,
        gaps_filled,
        skill_matches,
        critical_gaps_addressed,
    }
}

/// Scores every template and sorts by priority score, highest first (stable).
pub fn generate_recommendations(
    analysis: &SkillGapAnalysis,
    templates: &[ProjectTemplate],
) -> Vec<ProjectRecommendation> {
    let mut recommendations: Vec<ProjectRecommendation> =
        templates.iter().map(|t| recommend(t, analysis)).collect();
    recommendations.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
    recommendations
}

/// Catalog-backed engine with an optional live template source.
#[derive(Clone)]
pub struct RecommendationEngine {
    catalog: Arc<ProjectCatalog>,
    live: Option<LiveTemplateSource>,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<ProjectCatalog>, live: Option<LiveTemplateSource>) -> Self {
        Self { catalog, live }
    }

    pub fn catalog(&self) -> &ProjectCatalog {
        &self.catalog
    }

    pub fn live_enabled(&self) -> bool {
        self.live.is_some()
    }

    /// Recommendations from the local catalog only.
    pub fn generate(&self, analysis: &SkillGapAnalysis) -> Vec<ProjectRecommendation> {
        generate_recommendations(analysis, self.catalog.templates())
    }

    /// Recommendations from the local catalog merged with live templates.
    ///
    /// Never fails: without a live source, or when the fetch fails, this is
    /// exactly `generate`.
    pub async fn generate_with_live(
        &self,
        analysis: &SkillGapAnalysis,
        category: Option<Category>,
    ) -> Vec<ProjectRecommendation> {
        let Some(live) = &self.live else {
            debug!("Live templates not configured; using local catalog");
            return self.generate(analysis);
        };

        let role = normalize(&analysis.role);
        let fetched = live.fetch_templates(&role, category).await;
        let templates = self.catalog.merged_with(fetched);
        info!(
            "Recommending from {} templates ({} local) for role {}",
            templates.len(),
            self.catalog.len(),
            role
        );
        generate_recommendations(analysis, &templates)
    }
}
