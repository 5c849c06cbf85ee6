use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A dependency manifest captured from a repository (e.g. `package.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DependencyFile {
    pub path: String,
    pub contents: String,
}

/// A synchronized repository as supplied by the persistence layer.
///
/// Every signal is optional in practice: missing complexity, description or
/// commit date are read as 0 / empty / "never" by the scorers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Language name → bytes of code, as reported by the hosting provider.
    #[serde(default)]
    pub languages: BTreeMap<String, u64>,
    #[serde(default)]
    pub stars: u32,
    #[serde(default)]
    pub complexity_score: Option<f64>,
    #[serde(default)]
    pub last_commit_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub dependency_files: Vec<DependencyFile>,
}

impl ProjectRecord {
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_record_deserializes_with_defaults() {
        let project: ProjectRecord = serde_json::from_str(r#"{"id": "p1"}"#).unwrap();
        assert_eq!(project.id, "p1");
        assert_eq!(project.stars, 0);
        assert!(project.languages.is_empty());
        assert!(project.complexity_score.is_none());
        assert_eq!(project.description_text(), "");
    }

    #[test]
    fn test_camel_case_fields() {
        let json = r#"{
            "id": "p2",
            "name": "shop",
            "languages": {"TypeScript": 1200, "CSS": 300},
            "complexityScore": 72.5,
            "lastCommitDate": "2024-03-01T12:00:00Z"
        }"#;
        let project: ProjectRecord = serde_json::from_str(json).unwrap();
        assert_eq!(project.languages.len(), 2);
        assert_eq!(project.complexity_score, Some(72.5));
        assert!(project.last_commit_date.is_some());
    }
}
