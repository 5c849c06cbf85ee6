//! Filter & sort over a recommendation list. Pure; never mutates its input.

use serde::de::{value::StrDeserializer, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::template::{Category, Difficulty};
use crate::recommendations::engine::{Priority, ProjectRecommendation};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    Weekend,
    Week,
    Extended,
}

impl TimeBucket {
    pub fn ordinal(self) -> u8 {
        match self {
            TimeBucket::Weekend => 0,
            TimeBucket::Week => 1,
            TimeBucket::Extended => 2,
        }
    }
}

/// Ordered keyword rules; the first rule with a matching keyword wins.
const TIME_RULES: &[(TimeBucket, &[&str])] = &[
    (TimeBucket::Extended, &["weeks", "month", "40+ hour"]),
    (TimeBucket::Weekend, &["weekend", "1-2 day", "8-16 hour"]),
    (TimeBucket::Week, &["week", "days", "3-5 day", "20-40 hour"]),
    (TimeBucket::Weekend, &["1 day", "hour"]),
];

/// Buckets a free-text time estimate. Unrecognized text is `Extended`.
pub fn time_bucket(estimate: &str) -> TimeBucket {
    let estimate = estimate.to_lowercase();
    TIME_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| estimate.contains(k)))
        .map(|(bucket, _)| *bucket)
        .unwrap_or(TimeBucket::Extended)
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Priority,
    Difficulty,
    Time,
    Skills,
}

impl SortBy {
    /// Priority and skills sort descending; difficulty and time ascending.
    pub fn default_ascending(self) -> bool {
        match self {
            SortBy::Priority | SortBy::Skills => false,
            SortBy::Difficulty | SortBy::Time => true,
        }
    }

    fn key(self, rec: &ProjectRecommendation) -> usize {
        match self {
            SortBy::Priority => rec.priority_score as usize,
            SortBy::Difficulty => rec.template.difficulty.ordinal() as usize,
            SortBy::Time => time_bucket(&rec.template.time_estimate).ordinal() as usize,
            SortBy::Skills => rec.template.skills_taught.len(),
        }
    }
}

/// Query object. Unset fields and the literal "all" are wildcards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(default, deserialize_with = "all_as_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, deserialize_with = "all_as_none")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "all_as_none")]
    pub time_commitment: Option<TimeBucket>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub sort_by: SortBy,
    #[serde(default, deserialize_with = "all_as_none")]
    pub priority_level: Option<Priority>,
}

fn all_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => {
            let value: StrDeserializer<'_, D::Error> = value.into_deserializer();
            T::deserialize(value).map(Some)
        }
    }
}

impl FilterState {
    pub fn matches(&self, rec: &ProjectRecommendation) -> bool {
        let template = &rec.template;
        self.difficulty.map_or(true, |d| template.difficulty == d)
            && self.category.map_or(true, |c| template.category == c)
            && self
                .time_commitment
                .map_or(true, |t| time_bucket(&template.time_estimate) == t)
            && self.matches_skills(&template.skills_taught)
            && self.priority_level.map_or(true, |p| rec.priority == p)
    }

    /// Any-of, case-insensitive. No requested skills matches everything.
    fn matches_skills(&self, skills_taught: &[String]) -> bool {
        if self.skills.is_empty() {
            return true;
        }
        self.skills.iter().any(|wanted| {
            skills_taught
                .iter()
                .any(|taught| taught.trim().eq_ignore_ascii_case(wanted.trim()))
        })
    }
}

pub fn apply_filters(list: &[ProjectRecommendation], filters: &FilterState) -> Vec<ProjectRecommendation> {
    list.iter().filter(|rec| filters.matches(rec)).cloned().collect()
}

/// Stable sort into a new list. `ascending` overrides the mode's natural direction.
pub fn sort_recommendations(
    list: &[ProjectRecommendation],
    sort_by: SortBy,
    ascending: Option<bool>,
) -> Vec<ProjectRecommendation> {
    let ascending = ascending.unwrap_or_else(|| sort_by.default_ascending());
    let mut sorted = list.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = sort_by.key(a).cmp(&sort_by.key(b));
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
    sorted
}

/// `apply_filters` then `sort_recommendations` by the state's `sort_by`.
pub fn filter_and_sort(
    list: &[ProjectRecommendation],
    filters: &FilterState,
    ascending: Option<bool>,
) -> Vec<ProjectRecommendation> {
    sort_recommendations(&apply_filters(list, filters), filters.sort_by, ascending)
}
