//! Project template catalog: loaded once at startup, immutable afterwards.

use std::collections::HashSet;
use std::path::Path;

use crate::errors::DataError;
use crate::models::template::ProjectTemplate;

const BUILTIN_CATALOG: &str = include_str!("../../data/project_templates.json");

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCatalog {
    templates: Vec<ProjectTemplate>,
}

impl ProjectCatalog {
    /// Builds a catalog, rejecting duplicate or empty ids.
    pub fn new(templates: Vec<ProjectTemplate>) -> Result<Self, DataError> {
        let mut ids = HashSet::new();
        for template in &templates {
            if template.id.trim().is_empty() {
                return Err(DataError::Invalid(format!(
                    "template '{}' has an empty id",
                    template.name
                )));
            }
            if !ids.insert(template.id.as_str()) {
                return Err(DataError::Invalid(format!(
                    "duplicate template id '{}'",
                    template.id
                )));
            }
        }
        Ok(Self { templates })
    }

    pub fn builtin() -> Result<Self, DataError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let templates: Vec<ProjectTemplate> =
            serde_json::from_str(json).map_err(|source| DataError::Parse {
                what: "project catalog",
                source,
            })?;
        Self::new(templates)
    }

    /// Loads the catalog from `path`, or the built-in catalog when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, DataError> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| DataError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                Self::from_json_str(&json)
            }
            None => Self::builtin(),
        }
    }

    pub fn templates(&self) -> &[ProjectTemplate] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&ProjectTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Local templates followed by every `extra` template whose id is new.
    /// Local entries win on collision; the first of duplicate extras wins.
    pub fn merged_with(&self, extra: Vec<ProjectTemplate>) -> Vec<ProjectTemplate> {
        let mut seen: HashSet<String> = self.templates.iter().map(|t| t.id.clone()).collect();
        let mut merged = self.templates.clone();
        merged.extend(extra.into_iter().filter(|t| seen.insert(t.id.clone())));
        merged
    }
}
