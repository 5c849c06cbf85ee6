//! Role taxonomy: the versioned, immutable role → skill-tier table.
//!
//! The built-in table is compiled from `data/role_taxonomy.json`. A deployment may
//! replace it with its own file; tests build synthetic taxonomies in memory.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::DataError;
use crate::models::template::Category;
use crate::skills::matcher::normalize;

const BUILTIN_TAXONOMY: &str = include_str!("../../data/role_taxonomy.json");

/// Importance of a skill to a role, highest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SkillTier {
    Essential,
    Preferred,
    NiceToHave,
}

impl SkillTier {
    /// All tiers in priority order.
    pub const ALL: [SkillTier; 3] = [SkillTier::Essential, SkillTier::Preferred, SkillTier::NiceToHave];

    /// Coverage weight of one skill in this tier.
    pub fn coverage_weight(self) -> u32 {
        match self {
            SkillTier::Essential => 3,
            SkillTier::Preferred => 2,
            SkillTier::NiceToHave => 1,
        }
    }
}

/// Skill expectations for one role, grouped by tier.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoleSkillTiers {
    /// Template category associated with the role, used by live-merge inference.
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub essential: Vec<String>,
    #[serde(default)]
    pub preferred: Vec<String>,
    #[serde(default)]
    pub nice_to_have: Vec<String>,
}

impl RoleSkillTiers {
    pub fn tier(&self, tier: SkillTier) -> &[String] {
        match tier {
            SkillTier::Essential => &self.essential,
            SkillTier::Preferred => &self.preferred,
            SkillTier::NiceToHave => &self.nice_to_have,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleTaxonomy {
    pub version: String,
    roles: BTreeMap<String, RoleSkillTiers>,
}

impl RoleTaxonomy {
    /// Builds a taxonomy from role entries; role keys are normalized.
    pub fn new(version: impl Into<String>, roles: impl IntoIterator<Item = (String, RoleSkillTiers)>) -> Self {
        Self {
            version: version.into(),
            roles: roles
                .into_iter()
                .map(|(role, tiers)| (normalize(&role), tiers))
                .collect(),
        }
    }

    /// The taxonomy shipped with the service.
    pub fn builtin() -> Result<Self, DataError> {
        Self::from_json_str(BUILTIN_TAXONOMY)
    }

    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let raw: RoleTaxonomy = serde_json::from_str(json).map_err(|source| DataError::Parse {
            what: "role taxonomy",
            source,
        })?;
        if raw.roles.is_empty() {
            return Err(DataError::Invalid("role taxonomy defines no roles".to_string()));
        }
        let mut keys = HashSet::new();
        if let Some(role) = raw.roles.keys().find(|role| !keys.insert(normalize(role))) {
            return Err(DataError::Invalid(format!(
                "duplicate role '{}' in role taxonomy",
                normalize(role)
            )));
        }
        Ok(Self::new(raw.version, raw.roles))
    }

    /// Loads the taxonomy from `path`, or the built-in table when no path is given.
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

    pub fn get(&self, role: &str) -> Option<&RoleSkillTiers> {
        self.roles.get(&normalize(role))
    }

    pub fn contains(&self, role: &str) -> bool {
        self.get(role).is_some()
    }

    /// Known role keys in sorted order.
    pub fn role_keys(&self) -> Vec<&str> {
        self.roles.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
