use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Ordinal used for sorting: beginner < intermediate < advanced.
    pub fn ordinal(self) -> u8 {
        match self {
            Difficulty::Beginner => 0,
            Difficulty::Intermediate => 1,
            Difficulty::Advanced => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Frontend,
    Backend,
    Fullstack,
    Devops,
    Data,
    Mobile,
    Ml,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Frontend => "frontend",
            Category::Backend => "backend",
            Category::Fullstack => "fullstack",
            Category::Devops => "devops",
            Category::Data => "data",
            Category::Mobile => "mobile",
            Category::Ml => "ml",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LearningResource {
    pub title: String,
    pub url: String,
}

/// A catalog entry describing a learning project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    pub difficulty: Difficulty,
    /// Free text such as "1-2 weeks" or "a weekend".
    pub time_estimate: String,
    #[serde(default)]
    pub skills_taught: Vec<String>,
    pub category: Category,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub learning_resources: Vec<LearningResource>,
}
