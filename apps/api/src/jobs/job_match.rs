//! Job Match: how many of a posting's required skills a user's projects evidence.
//!
//! Algorithm:
//! 1. User skills = project language keys ∪ detected description keywords ∪ baseline.
//! 2. Required skills are de-duplicated case-insensitively (first spelling kept).
//! 3. A required skill is matched iff any user skill matches it.
//! 4. match_percentage = round(matched / required × 100), 0 for an empty list.
//! 5. Recommended projects: those whose languages match a matched skill, by stars, top 5.

use serde::{Deserialize, Serialize};

use crate::models::project::ProjectRecord;
use crate::skills::detection::{detect_skills, BASELINE_SKILLS};
use crate::skills::matcher::{dedupe_skills, matches_any, round_percentage, skills_match};

const RECOMMENDED_PROJECT_LIMIT: usize = 5;

/// Which evidence source first satisfied each matched required skill.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchBreakdown {
    pub from_languages: Vec<String>,
    pub from_descriptions: Vec<String>,
    pub from_baseline: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchResult {
    pub match_percentage: u8,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    /// Project ids, most-starred first.
    pub recommended_projects: Vec<String>,
    pub breakdown: JobMatchBreakdown,
}

/// Skills inferred from a project set, grouped by evidence source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserSkillProfile {
    pub languages: Vec<String>,
    pub detected: Vec<String>,
    pub baseline: Vec<String>,
}

impl UserSkillProfile {
    pub fn from_projects(projects: &[ProjectRecord]) -> Self {
        let languages: Vec<&String> = projects.iter().flat_map(|p| p.languages.keys()).collect();
        let detected: Vec<String> = projects
            .iter()
            .flat_map(|p| detect_skills(p.description_text()))
            .collect();

        Self {
            languages: dedupe_skills(&languages),
            detected: dedupe_skills(&detected),
            baseline: BASELINE_SKILLS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.languages
            .iter()
            .chain(self.detected.iter())
            .chain(self.baseline.iter())
    }
}

/// Scores `required_skills` against the skills evidenced by `projects`.
pub fn score_job_match<S: AsRef<str>>(
    required_skills: &[S],
    projects: &[ProjectRecord],
) -> JobMatchResult {
    let required = dedupe_skills(required_skills);
    let profile = UserSkillProfile::from_projects(projects);

    let mut matched_skills = Vec::new();
    let mut missing_skills = Vec::new();
    let mut breakdown = JobMatchBreakdown::default();

    for skill in required {
        if matches_any(&skill, &profile.languages) {
            breakdown.from_languages.push(skill.clone());
        } else if matches_any(&skill, &profile.detected) {
            breakdown.from_descriptions.push(skill.clone());
        } else if matches_any(&skill, &profile.baseline) {
            breakdown.from_baseline.push(skill.clone());
        } else {
            missing_skills.push(skill);
            continue;
        }
        matched_skills.push(skill);
    }

    let total = matched_skills.len() + missing_skills.len();
    let match_percentage = round_percentage(matched_skills.len() as f64, total as f64);
    let recommended_projects = recommend_projects(projects, &matched_skills);

    JobMatchResult {
        match_percentage,
        matched_skills,
        missing_skills,
        recommended_projects,
        breakdown,
    }
}

/// Projects whose language set overlaps a matched skill, most-starred first.
fn recommend_projects(projects: &[ProjectRecord], matched_skills: &[String]) -> Vec<String> {
    let mut relevant: Vec<&ProjectRecord> = projects
        .iter()
        .filter(|p| {
            p.languages
                .keys()
                .any(|language| matched_skills.iter().any(|m| skills_match(language, m)))
        })
        .collect();
    // Stable: equal star counts keep input order.
    relevant.sort_by(|a, b| b.stars.cmp(&a.stars));
    relevant
        .into_iter()
        .take(RECOMMENDED_PROJECT_LIMIT)
        .map(|p| p.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn make_project(id: &str, languages: &[&str], description: Option<&str>, stars: u32) -> ProjectRecord {
        ProjectRecord {
            id: id.to_string(),
            name: id.to_string(),
            description: description.map(str::to_string),
            languages: languages
                .iter()
                .map(|l| (l.to_string(), 1000))
                .collect::<BTreeMap<_, _>>(),
            stars,
            ..Default::default()
        }
    }

    #[test]
    fn test_identical_skills_is_full_match() {
        let projects = vec![make_project("p1", &["Rust", "Python"], None, 3)];
        let result = score_job_match(&["Rust", "Python"], &projects);
        assert_eq!(result.match_percentage, 100);
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn test_disjoint_skills_is_zero_match() {
        let projects = vec![make_project("p1", &["Haskell"], None, 0)];
        let result = score_job_match(&["Kotlin", "Swift"], &projects);
        assert_eq!(result.match_percentage, 0);
        assert!(result.matched_skills.is_empty());
        assert!(result.recommended_projects.is_empty());
    }

    #[test]
    fn test_two_of_three_rounds_up_to_67() {
        let projects = vec![make_project("p1", &["Rust", "Python"], None, 0)];
        let result = score_job_match(&["Rust", "Python", "Elixir"], &projects);
        assert_eq!(result.matched_skills.len(), 2);
        assert_eq!(result.match_percentage, 67);
    }

    #[test]
    fn test_empty_required_list_is_zero() {
        let projects = vec![make_project("p1", &["Rust"], None, 0)];
        let result = score_job_match::<String>(&[], &projects);
        assert_eq!(result.match_percentage, 0);
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn test_counts_add_up_after_dedup_of_required() {
        let projects = vec![make_project("p1", &["Rust"], None, 0)];
        let required = ["Rust", "rust", "Go", "GO ", "Elixir"];
        let result = score_job_match(&required, &projects);
        assert_eq!(result.matched_skills.len() + result.missing_skills.len(), 3);
        assert_eq!(result.matched_skills, vec!["Rust"]);
        assert_eq!(result.missing_skills, vec!["Go", "Elixir"]);
    }

    #[test]
    fn test_original_casing_preserved() {
        let projects = vec![make_project("p1", &["TypeScript"], None, 0)];
        let result = score_job_match(&["TYPESCRIPT"], &projects);
        assert_eq!(result.matched_skills, vec!["TYPESCRIPT"]);
    }

    #[test]
    fn test_baseline_skills_always_count() {
        let result = score_job_match(&["Git", "GitHub"], &[]);
        assert_eq!(result.match_percentage, 100);
        assert_eq!(result.breakdown.from_baseline, vec!["Git", "GitHub"]);
    }

    #[test]
    fn test_description_detection() {
        let projects = vec![make_project(
            "shop",
            &["JavaScript"],
            Some("E-commerce site in Next.js with a fully responsive layout"),
            1,
        )];
        let result = score_job_match(&["Next.js", "Responsive Design", "Vue"], &projects);
        assert_eq!(result.matched_skills, vec!["Next.js", "Responsive Design"]);
        assert_eq!(
            result.breakdown.from_descriptions,
            vec!["Next.js", "Responsive Design"]
        );
        assert_eq!(result.missing_skills, vec!["Vue"]);
    }

    #[test]
    fn test_recommended_projects_sorted_by_stars_and_capped() {
        let projects: Vec<ProjectRecord> = (0..7)
            .map(|i| make_project(&format!("p{i}"), &["Python"], None, i * 10))
            .chain(std::iter::once(make_project("other", &["Haskell"], None, 999)))
            .collect();
        let result = score_job_match(&["Python"], &projects);
        assert_eq!(result.recommended_projects, vec!["p6", "p5", "p4", "p3", "p2"]);
    }

    #[test]
    fn test_percentage_bounded() {
        let projects = vec![make_project("p1", &["Rust", "Go", "C"], None, 0)];
        for required in [vec!["Rust"], vec!["Rust", "Go", "C", "Zig"], vec!["Zig"]] {
            let result = score_job_match(&required, &projects);
            assert!(result.match_percentage <= 100);
        }
    }
}
