//! Skill Matcher: normalization and permissive equality between two skill strings.
//!
//! Two skills match when their normalized forms are equal, when one contains the
//! other, or when both belong to the same synonym group. The relation is reflexive
//! and symmetric but NOT transitive: "c" matches "c++" and "c++" matches "c++ 17",
//! and short tokens match generously. Recommendation and job-match results depend
//! on this permissiveness.

/// Groups of interchangeable skill names, already normalized.
const SYNONYM_GROUPS: &[&[&str]] = &[
    &["javascript", "js", "ecmascript"],
    &["typescript", "ts"],
    &["node", "node.js", "nodejs"],
    &["react", "react.js", "reactjs"],
    &["vue", "vue.js", "vuejs"],
    &["next.js", "nextjs"],
    &["express", "express.js", "expressjs"],
    &["postgresql", "postgres", "psql"],
    &["mongodb", "mongo"],
    &["kubernetes", "k8s"],
    &["go", "golang"],
    &["c#", "csharp"],
    &["c++", "cpp"],
    &["python", "py"],
    &["css", "css3"],
    &["html", "html5"],
    &["machine learning", "ml"],
    &["ci/cd", "continuous integration", "continuous delivery"],
    &["aws", "amazon web services"],
    &["gcp", "google cloud"],
    &["rest api", "rest", "restful"],
    &["responsive design", "responsive", "mobile-first"],
    &["git", "version control"],
    &["tailwind css", "tailwind", "tailwindcss"],
];

/// Lower-cases and trims a skill string.
pub fn normalize(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// Returns true when `a` and `b` name the same skill under the permissive rules.
///
/// An empty skill only matches another empty skill; it is never treated as a
/// substring of everything.
pub fn skills_match(a: &str, b: &str) -> bool {
    let a = normalize(a);
    let b = normalize(b);
    normalized_match(&a, &b)
}

/// `skills_match` for inputs that are already normalized.
pub fn normalized_match(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a.contains(b) || b.contains(a) {
        return true;
    }
    are_synonyms(a, b)
}

fn are_synonyms(a: &str, b: &str) -> bool {
    SYNONYM_GROUPS
        .iter()
        .any(|group| group.contains(&a) && group.contains(&b))
}

/// True when any candidate in `pool` matches `skill`.
pub fn matches_any<S: AsRef<str>>(skill: &str, pool: &[S]) -> bool {
    let skill = normalize(skill);
    pool.iter()
        .any(|candidate| normalized_match(&skill, &normalize(candidate.as_ref())))
}

/// Trims every skill, drops empties, and keeps the first spelling of each
/// case-insensitive duplicate.
pub fn dedupe_skills<S: AsRef<str>>(skills: &[S]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    skills
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Percentage of `part` over `whole`, rounded half up and clamped to 0..=100.
/// A zero (or negative) denominator yields 0.
pub fn round_percentage(part: f64, whole: f64) -> u8 {
    if whole <= 0.0 {
        return 0;
    }
    // f64::round rounds half away from zero, which is half-up for non-negative values.
    ((part / whole) * 100.0).round().clamp(0.0, 100.0) as u8
}
