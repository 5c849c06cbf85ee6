//! Skill-Gap Analyzer: tiered missing-skill sets and weighted coverage for a role.
//!
//! Algorithm:
//! 1. For each tier skill of the role, it is covered iff some present skill matches it.
//! 2. Uncovered tier skills are reported per tier, in taxonomy order.
//! 3. coverage = round(Σ weight(covered) / Σ weight(all) × 100), weights 3/2/1.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::skills::matcher::{dedupe_skills, matches_any, normalize, round_percentage};
use crate::skills::taxonomy::{RoleTaxonomy, SkillTier};

const SUMMARY_PRIORITY_LIMIT: usize = 5;

#[derive(Debug, Error, PartialEq)]
pub enum SkillGapError {
    #[error("Unknown role '{0}'")]
    InvalidRole(String),
}

/// Tier skills no present skill covers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MissingSkills {
    pub essential: Vec<String>,
    pub preferred: Vec<String>,
    pub nice_to_have: Vec<String>,
}

impl MissingSkills {
    pub fn tier(&self, tier: SkillTier) -> &[String] {
        match tier {
            SkillTier::Essential => &self.essential,
            SkillTier::Preferred => &self.preferred,
            SkillTier::NiceToHave => &self.nice_to_have,
        }
    }

    fn tier_mut(&mut self, tier: SkillTier) -> &mut Vec<String> {
        match tier {
            SkillTier::Essential => &mut self.essential,
            SkillTier::Preferred => &mut self.preferred,
            SkillTier::NiceToHave => &mut self.nice_to_have,
        }
    }

    /// Missing skills in priority order: essential, preferred, nice-to-have.
    pub fn in_priority_order(&self) -> impl Iterator<Item = &String> {
        SkillTier::ALL.into_iter().flat_map(move |tier| self.tier(tier).iter())
    }

    pub fn total(&self) -> usize {
        self.essential.len() + self.preferred.len() + self.nice_to_have.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillGapAnalysis {
    pub role: String,
    pub present_skills: Vec<String>,
    pub missing_skills: MissingSkills,
    pub coverage_percentage: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CoverageStatus {
    Excellent,
    Good,
    NeedsWork,
    Beginner,
}

impl CoverageStatus {
    pub fn from_coverage(coverage: u8) -> Self {
        match coverage {
            c if c >= 90 => CoverageStatus::Excellent,
            c if c >= 70 => CoverageStatus::Good,
            c if c >= 40 => CoverageStatus::NeedsWork,
            _ => CoverageStatus::Beginner,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GapSummary {
    pub status: CoverageStatus,
    /// Up to five missing skills, most important tier first.
    pub priority: Vec<String>,
    pub message: String,
}

/// Analyzer bound to one taxonomy version.
#[derive(Debug, Clone)]
pub struct SkillGapAnalyzer {
    taxonomy: Arc<RoleTaxonomy>,
}

impl SkillGapAnalyzer {
    pub fn new(taxonomy: Arc<RoleTaxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &RoleTaxonomy {
        &self.taxonomy
    }

    /// Computes which of the role's skills are missing from `present_skills`.
    ///
    /// Fails only when `role` is not part of the taxonomy.
    pub fn analyze<S: AsRef<str>>(
        &self,
        present_skills: &[S],
        role: &str,
    ) -> Result<SkillGapAnalysis, SkillGapError> {
        let tiers = self
            .taxonomy
            .get(role)
            .ok_or_else(|| SkillGapError::InvalidRole(role.trim().to_string()))?;

        let present = dedupe_skills(present_skills);
        let mut missing = MissingSkills::default();
        let mut covered_weight = 0u32;
        let mut total_weight = 0u32;

        for tier in SkillTier::ALL {
            let weight = tier.coverage_weight();
            for skill in tiers.tier(tier) {
                total_weight += weight;
                if matches_any(skill, &present) {
                    covered_weight += weight;
                } else {
                    missing.tier_mut(tier).push(skill.clone());
                }
            }
        }

        Ok(SkillGapAnalysis {
            role: normalize(role),
            present_skills: present,
            missing_skills: missing,
            coverage_percentage: round_percentage(covered_weight as f64, total_weight as f64),
        })
    }
}

/// Condenses an analysis into a status, a short priority list, and a message.
pub fn summarize(analysis: &SkillGapAnalysis) -> GapSummary {
    let coverage = analysis.coverage_percentage;
    let status = CoverageStatus::from_coverage(coverage);
    let priority: Vec<String> = analysis
        .missing_skills
        .in_priority_order()
        .take(SUMMARY_PRIORITY_LIMIT)
        .cloned()
        .collect();

    let role = &analysis.role;
    let focus = priority.join(", ");
    let message = match status {
        CoverageStatus::Excellent if priority.is_empty() => format!(
            "You cover the full {role} skill set. Polish your portfolio and start applying."
        ),
        CoverageStatus::Excellent => format!(
            "You cover {coverage}% of the {role} skill set. Round it out with: {focus}."
        ),
        CoverageStatus::Good => format!(
            "Solid {role} foundation ({coverage}% coverage). Close the remaining gaps: {focus}."
        ),
        CoverageStatus::NeedsWork => format!(
            "You cover {coverage}% of the {role} skill set. Focus on these next: {focus}."
        ),
        CoverageStatus::Beginner => format!(
            "You're early in the {role} path ({coverage}% coverage). Start with: {focus}."
        ),
    };

    GapSummary {
        status,
        priority,
        message,
    }
}
