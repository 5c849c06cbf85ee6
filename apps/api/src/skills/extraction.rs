//! Skill extraction fan-out: one bounded task per project, merged by set union.
//!
//! Each task tries the extractor's fast local path (dependency manifests) and only
//! falls back to the slow external path when the fast path finds nothing. A task
//! that fails, times out, or is cancelled contributes nothing; the batch always
//! returns whatever the other tasks produced.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::models::project::{DependencyFile, ProjectRecord};
use crate::skills::detection::detect_skills;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("external analysis failed: {0}")]
    External(String),
}

/// Two-stage extraction strategy. Implement this to plug in another analysis
/// provider without touching the executor.
#[async_trait]
pub trait SkillExtractor: Send + Sync {
    /// Cheap, local extraction. `None` (or an empty set) defers to the slow path.
    async fn fast_local_extract(&self, project: &ProjectRecord) -> Option<BTreeSet<String>>;

    async fn slow_external_extract(
        &self,
        project: &ProjectRecord,
    ) -> Result<BTreeSet<String>, ExtractionError>;
}

// ────────────────────────────────────────────────────────────────────────────
// DependencySkillExtractor
// ────────────────────────────────────────────────────────────────────────────

/// Package name → skill it evidences.
const DEPENDENCY_SKILLS: &[(&str, &str)] = &[
    ("react", "React"),
    ("react-dom", "React"),
    ("react-native", "React Native"),
    ("next", "Next.js"),
    ("vue", "Vue"),
    ("@angular/core", "Angular"),
    ("svelte", "Svelte"),
    ("redux", "Redux"),
    ("@reduxjs/toolkit", "Redux"),
    ("zustand", "State Management"),
    ("tailwindcss", "Tailwind CSS"),
    ("express", "Express"),
    ("graphql", "GraphQL"),
    ("@apollo/client", "GraphQL"),
    ("socket.io", "WebSockets"),
    ("ws", "WebSockets"),
    ("jsonwebtoken", "Authentication"),
    ("passport", "Authentication"),
    ("next-auth", "Authentication"),
    ("pg", "PostgreSQL"),
    ("mongoose", "MongoDB"),
    ("mongodb", "MongoDB"),
    ("redis", "Redis"),
    ("prisma", "SQL"),
    ("jest", "Testing"),
    ("vitest", "Testing"),
    ("cypress", "Testing"),
    ("typescript", "TypeScript"),
    ("django", "Django"),
    ("flask", "Flask"),
    ("fastapi", "FastAPI"),
    ("pandas", "Pandas"),
    ("numpy", "NumPy"),
    ("matplotlib", "Data Visualization"),
    ("seaborn", "Data Visualization"),
    ("scikit-learn", "Machine Learning"),
    ("torch", "PyTorch"),
    ("tensorflow", "TensorFlow"),
    ("pytest", "Testing"),
    ("sqlalchemy", "SQL"),
    ("psycopg2", "PostgreSQL"),
    ("axum", "REST API"),
    ("actix-web", "REST API"),
    ("sqlx", "SQL"),
    ("diesel", "SQL"),
    ("gin-gonic/gin", "REST API"),
    ("labstack/echo", "REST API"),
    ("gorm.io/gorm", "SQL"),
];

/// Parses dependency manifests on the fast path and scans the description on the
/// slow path.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencySkillExtractor;

#[async_trait]
impl SkillExtractor for DependencySkillExtractor {
    async fn fast_local_extract(&self, project: &ProjectRecord) -> Option<BTreeSet<String>> {
        let skills: BTreeSet<String> = project
            .dependency_files
            .iter()
            .flat_map(skills_from_manifest)
            .collect();
        (!skills.is_empty()).then_some(skills)
    }

    async fn slow_external_extract(
        &self,
        project: &ProjectRecord,
    ) -> Result<BTreeSet<String>, ExtractionError> {
        let mut skills: BTreeSet<String> = project.languages.keys().cloned().collect();
        skills.extend(detect_skills(project.description_text()));
        Ok(skills)
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Skills evidenced by one manifest. Unknown manifest kinds yield nothing.
pub fn skills_from_manifest(file: &DependencyFile) -> Vec<String> {
    let (ecosystem, packages): (&[&str], Vec<String>) = match file_name(&file.path) {
        "package.json" => (
            &["JavaScript", "Node.js"][..],
            package_json_dependencies(&file.contents),
        ),
        "requirements.txt" => (&["Python"][..], requirements_dependencies(&file.contents)),
        "Cargo.toml" => (&["Rust"][..], cargo_dependencies(&file.contents)),
        "go.mod" => (&["Go"][..], go_mod_dependencies(&file.contents)),
        _ => return Vec::new(),
    };

    let mut skills: Vec<String> = ecosystem.iter().map(|s| s.to_string()).collect();
    skills.extend(packages.iter().filter_map(|package| {
        DEPENDENCY_SKILLS
            .iter()
            .find(|(name, _)| package == name)
            .map(|(_, skill)| skill.to_string())
    }));
    skills
}

fn package_json_dependencies(contents: &str) -> Vec<String> {
    let manifest: serde_json::Value = match serde_json::from_str(contents) {
        Ok(value) => value,
        Err(e) => {
            debug!("Unparseable package.json: {e}");
            return Vec::new();
        }
    };
    ["dependencies", "devDependencies"]
        .iter()
        .filter_map(|section| manifest.get(section).and_then(|v| v.as_object()))
        .flat_map(|deps| deps.keys().map(|k| k.to_lowercase()))
        .collect()
}

fn requirements_dependencies(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .filter_map(|line| {
            line.split(['=', '<', '>', '!', '~', ';', '[', ' '])
                .next()
                .map(|name| name.trim().to_lowercase())
        })
        .filter(|name| !name.is_empty())
        .collect()
}

fn cargo_dependencies(contents: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();
    for line in contents.lines().map(str::trim) {
        if line.starts_with('[') {
            in_dependencies = line.ends_with("dependencies]");
            continue;
        }
        if !in_dependencies || line.starts_with('#') {
            continue;
        }
        if let Some((name, _)) = line.split_once('=') {
            names.push(name.trim().to_lowercase());
        }
    }
    names
}

fn go_mod_dependencies(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            let line = line.strip_prefix("require ").unwrap_or(line);
            let module = line.split_whitespace().next()?;
            // github.com/owner/repo → owner/repo; other hosts keep the full path.
            let module = module.strip_prefix("github.com/").unwrap_or(module);
            module.contains('/').then(|| module.to_lowercase())
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Executor
// ────────────────────────────────────────────────────────────────────────────

/// Result of one fan-out batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionOutcome {
    pub skills: BTreeSet<String>,
    pub completed: usize,
    pub failed: usize,
    pub timed_out: usize,
    pub cancelled: usize,
}

enum TaskOutcome {
    Completed(BTreeSet<String>),
    Failed,
    TimedOut,
    Cancelled,
}

/// Bounded task group running a `SkillExtractor` across many projects.
#[derive(Clone)]
pub struct ExtractionExecutor {
    extractor: Arc<dyn SkillExtractor>,
    task_timeout: Duration,
    max_concurrency: usize,
}

impl ExtractionExecutor {
    pub fn new(
        extractor: Arc<dyn SkillExtractor>,
        task_timeout: Duration,
        max_concurrency: usize,
    ) -> Self {
        Self {
            extractor,
            task_timeout,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Extracts the union of skills across `projects`.
    ///
    /// Never fails. Cancelling `cancel` stops tasks that have not finished yet;
    /// results of tasks that already finished are kept.
    pub async fn extract(
        &self,
        projects: &[ProjectRecord],
        cancel: &CancellationToken,
    ) -> ExtractionOutcome {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for project in projects.iter().cloned() {
            let extractor = Arc::clone(&self.extractor);
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();
            let task_timeout = self.task_timeout;

            tasks.spawn(async move {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => TaskOutcome::Cancelled,
                    outcome = run_task(extractor.as_ref(), &project, &semaphore, task_timeout) => outcome,
                }
            });
        }

        let mut outcome = ExtractionOutcome::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(TaskOutcome::Completed(skills)) => {
                    outcome.completed += 1;
                    outcome.skills.extend(skills);
                }
                Ok(TaskOutcome::Failed) => outcome.failed += 1,
                Ok(TaskOutcome::TimedOut) => outcome.timed_out += 1,
                Ok(TaskOutcome::Cancelled) => outcome.cancelled += 1,
                Err(e) => {
                    warn!("Skill extraction task aborted: {e}");
                    outcome.failed += 1;
                }
            }
        }

        info!(
            "Skill extraction: {} projects, {} skills (completed={}, failed={}, timed_out={}, cancelled={})",
            projects.len(),
            outcome.skills.len(),
            outcome.completed,
            outcome.failed,
            outcome.timed_out,
            outcome.cancelled
        );
        outcome
    }
}

async fn run_task(
    extractor: &dyn SkillExtractor,
    project: &ProjectRecord,
    semaphore: &Semaphore,
    task_timeout: Duration,
) -> TaskOutcome {
    let _permit = match semaphore.acquire().await {
        Ok(permit) => permit,
        Err(_) => return TaskOutcome::Failed,
    };

    match tokio::time::timeout(task_timeout, extract_one(extractor, project)).await {
        Ok(Ok(skills)) => TaskOutcome::Completed(skills),
        Ok(Err(e)) => {
            warn!("Skill extraction failed for project {}: {e}", project.id);
            TaskOutcome::Failed
        }
        Err(_) => {
            warn!(
                "Skill extraction timed out for project {} after {}ms",
                project.id,
                task_timeout.as_millis()
            );
            TaskOutcome::TimedOut
        }
    }
}

async fn extract_one(
    extractor: &dyn SkillExtractor,
    project: &ProjectRecord,
) -> Result<BTreeSet<String>, ExtractionError> {
    if let Some(skills) = extractor.fast_local_extract(project).await {
        if !skills.is_empty() {
            debug!("Project {}: {} skills from manifests", project.id, skills.len());
            return Ok(skills);
        }
    }
    debug!("Project {}: falling back to external analysis", project.id);
    extractor.slow_external_extract(project).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn make_project(id: &str, description: Option<&str>, files: Vec<DependencyFile>) -> ProjectRecord {
        ProjectRecord {
            id: id.to_string(),
            name: id.to_string(),
            description: description.map(str::to_string),
            languages: BTreeMap::from([("TypeScript".to_string(), 100)]),
            dependency_files: files,
            ..Default::default()
        }
    }

    fn manifest(path: &str, contents: &str) -> DependencyFile {
        DependencyFile {
            path: path.to_string(),
            contents: contents.to_string(),
        }
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Scripted extractor: behaviour keyed by project id.
    struct ScriptedExtractor {
        slow_calls: AtomicUsize,
    }

    #[async_trait]
    impl SkillExtractor for ScriptedExtractor {
        async fn fast_local_extract(&self, project: &ProjectRecord) -> Option<BTreeSet<String>> {
            match project.id.as_str() {
                "fast" => Some(set(&["React"])),
                _ => None,
            }
        }

        async fn slow_external_extract(
            &self,
            project: &ProjectRecord,
        ) -> Result<BTreeSet<String>, ExtractionError> {
            self.slow_calls.fetch_add(1, Ordering::SeqCst);
            match project.id.as_str() {
                "slow" => Ok(set(&["Docker", "React"])),
                "broken" => Err(ExtractionError::External("provider down".to_string())),
                "hang" => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(set(&["Never"]))
                }
                _ => Ok(BTreeSet::new()),
            }
        }
    }

    fn scripted_executor(timeout: Duration) -> (ExtractionExecutor, Arc<ScriptedExtractor>) {
        let extractor = Arc::new(ScriptedExtractor {
            slow_calls: AtomicUsize::new(0),
        });
        let executor = ExtractionExecutor::new(extractor.clone(), timeout, 4);
        (executor, extractor)
    }

    #[test]
    fn test_package_json_manifest() {
        let file = manifest(
            "web/package.json",
            r#"{"dependencies": {"react": "^18", "express": "4"}, "devDependencies": {"jest": "29"}}"#,
        );
        let skills = skills_from_manifest(&file);
        for expected in ["JavaScript", "Node.js", "React", "Express", "Testing"] {
            assert!(skills.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn test_requirements_manifest() {
        let file = manifest(
            "requirements.txt",
            "# data stack\npandas==2.1.0\nnumpy>=1.26\n-r base.txt\nscikit-learn ; python_version > '3.8'\n",
        );
        let skills = skills_from_manifest(&file);
        assert_eq!(skills, vec!["Python", "Pandas", "NumPy", "Machine Learning"]);
    }

    #[test]
    fn test_cargo_manifest_reads_only_dependency_sections() {
        let file = manifest(
            "Cargo.toml",
            "[package]\nname = \"svc\"\n\n[dependencies]\naxum = \"0.7\"\nsqlx = { version = \"0.7\" }\n",
        );
        assert_eq!(skills_from_manifest(&file), vec!["Rust", "REST API", "SQL"]);
    }

    #[test]
    fn test_go_mod_manifest() {
        let file = manifest(
            "go.mod",
            "module example.com/api\n\ngo 1.22\n\nrequire (\n\tgithub.com/gin-gonic/gin v1.9.1\n)\n",
        );
        assert_eq!(skills_from_manifest(&file), vec!["Go", "REST API"]);
    }

    #[test]
    fn test_unknown_and_malformed_manifests() {
        assert!(skills_from_manifest(&manifest("pom.xml", "<project/>")).is_empty());
        // Malformed JSON still evidences the ecosystem.
        assert_eq!(
            skills_from_manifest(&manifest("package.json", "{not json")),
            vec!["JavaScript", "Node.js"]
        );
    }

    #[tokio::test]
    async fn test_default_extractor_prefers_manifests() {
        let project = make_project(
            "p1",
            Some("A Django app"),
            vec![manifest("package.json", r#"{"dependencies": {"vue": "3"}}"#)],
        );
        let fast = DependencySkillExtractor.fast_local_extract(&project).await.unwrap();
        assert!(fast.contains("Vue"));
        assert!(!fast.contains("Django"));
    }

    #[tokio::test]
    async fn test_default_extractor_slow_path_uses_description_and_languages() {
        let project = make_project("p1", Some("A Django app with Docker"), vec![]);
        assert!(DependencySkillExtractor.fast_local_extract(&project).await.is_none());
        let slow = DependencySkillExtractor
            .slow_external_extract(&project)
            .await
            .unwrap();
        assert_eq!(slow, set(&["Django", "Docker", "TypeScript"]));
    }

    #[tokio::test]
    async fn test_fan_out_merges_by_union_and_skips_slow_path_when_fast_succeeds() {
        let (executor, extractor) = scripted_executor(Duration::from_secs(5));
        let projects = vec![
            make_project("fast", None, vec![]),
            make_project("slow", None, vec![]),
        ];
        let outcome = executor.extract(&projects, &CancellationToken::new()).await;
        assert_eq!(outcome.skills, set(&["Docker", "React"]));
        assert_eq!(outcome.completed, 2);
        assert_eq!(extractor.slow_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_the_batch() {
        let (executor, _) = scripted_executor(Duration::from_secs(5));
        let projects = vec![
            make_project("broken", None, vec![]),
            make_project("fast", None, vec![]),
        ];
        let outcome = executor.extract(&projects, &CancellationToken::new()).await;
        assert_eq!(outcome.skills, set(&["React"]));
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.completed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_per_task_timeout() {
        let (executor, _) = scripted_executor(Duration::from_millis(50));
        let projects = vec![
            make_project("hang", None, vec![]),
            make_project("slow", None, vec![]),
        ];
        let outcome = executor.extract(&projects, &CancellationToken::new()).await;
        assert_eq!(outcome.timed_out, 1);
        assert_eq!(outcome.skills, set(&["Docker", "React"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_keeps_finished_results() {
        let (executor, _) = scripted_executor(Duration::from_secs(120));
        let projects = vec![
            make_project("fast", None, vec![]),
            make_project("hang", None, vec![]),
        ];
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let outcome = executor.extract(&projects, &cancel).await;
        assert_eq!(outcome.skills, set(&["React"]));
        assert_eq!(outcome.completed, 1);
        assert_eq!(outcome.cancelled, 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let (executor, _) = scripted_executor(Duration::from_secs(1));
        let outcome = executor.extract(&[], &CancellationToken::new()).await;
        assert_eq!(outcome, ExtractionOutcome::default());
    }
}
