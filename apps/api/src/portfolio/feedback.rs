use serde::{Deserialize, Serialize};

use crate::portfolio::scoring::PortfolioScoreResult;

/// Overall score below which the portfolio always gets at least one suggestion.
pub const GOOD_SCORE: u8 = 70;

const STRONG_CATEGORY: u8 = 80;
const WEAK_CATEGORY: u8 = 50;
const DIVERSE_STACK: u8 = 60;
const NARROW_STACK: u8 = 40;
const ACTIVE: u8 = 85;
const INACTIVE: u8 = 40;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeedbackBreakdown {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
}

impl FeedbackBreakdown {
    pub fn empty_portfolio() -> Self {
        Self {
            strengths: vec![],
            weaknesses: vec!["No projects found".to_string()],
            suggestions: vec![
                "Publish your first project to start building a portfolio".to_string(),
            ],
        }
    }
}

/// Threshold rules per category.
pub fn build_feedback(result: &PortfolioScoreResult, language_count: usize) -> FeedbackBreakdown {
    let mut feedback = FeedbackBreakdown::default();

    match result.project_quality_score {
        s if s >= STRONG_CATEGORY => feedback
            .strengths
            .push("Strong project complexity".to_string()),
        s if s < WEAK_CATEGORY => {
            feedback
                .weaknesses
                .push("Projects lack technical depth".to_string());
            feedback.suggestions.push(
                "Build a project beyond CRUD: add authentication, tests, or a deployment pipeline"
                    .to_string(),
            );
        }
        _ => {}
    }

    match result.tech_diversity_score {
        s if s >= DIVERSE_STACK => feedback
            .strengths
            .push(format!("Diverse tech stack ({language_count} languages)")),
        s if s < NARROW_STACK => {
            feedback
                .weaknesses
                .push("Limited language diversity".to_string());
            feedback
                .suggestions
                .push("Add a project in a second language or ecosystem".to_string());
        }
        _ => {}
    }

    match result.documentation_score {
        s if s >= STRONG_CATEGORY => feedback
            .strengths
            .push("Portfolio is well-documented".to_string()),
        s if s < WEAK_CATEGORY => {
            feedback
                .weaknesses
                .push("Projects are poorly documented".to_string());
            feedback
                .suggestions
                .push("Write a clear description and README for every project".to_string());
        }
        _ => {}
    }

    match result.consistency_score {
        s if s >= ACTIVE => feedback
            .strengths
            .push("Consistent recent activity".to_string()),
        s if s < INACTIVE => {
            feedback.weaknesses.push("Inconsistent activity".to_string());
            feedback
                .suggestions
                .push("Commit regularly; small updates still show ongoing work".to_string());
        }
        _ => {}
    }

    if !result.has_profile_readme {
        feedback
            .suggestions
            .push("Add a profile README to introduce yourself".to_string());
    }

    if result.overall_score < GOOD_SCORE && feedback.suggestions.is_empty() {
        feedback
            .suggestions
            .push("Polish your top projects with live demos and screenshots".to_string());
    }

    feedback
}
