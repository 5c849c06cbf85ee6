//! Live template source: fetches a role-specific project-listing page and turns
//! its links into best-effort `ProjectTemplate`s.
//!
//! Every failure here (HTTP, status, timeout, nothing parseable) degrades to an
//! empty list. Callers merge the result into the local catalog.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::template::{Category, Difficulty, LearningResource, ProjectTemplate};
use crate::skills::matcher::dedupe_skills;

pub const ROLE_PLACEHOLDER: &str = "{role}";
const LIVE_ID_PREFIX: &str = "live-";
const MIN_TITLE_LEN: usize = 3;
const MAX_TITLE_LEN: usize = 120;
const USER_AGENT: &str = concat!("skillscope-api/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// `fetch(url) -> text`, the only network capability the engine uses.
#[async_trait]
pub trait TextFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[derive(Clone)]
pub struct HttpTextFetcher {
    client: Client,
}

impl HttpTextFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TextFetcher for HttpTextFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

/// A fetcher plus the URL template and timeout it is called with.
#[derive(Clone)]
pub struct LiveTemplateSource {
    fetcher: Arc<dyn TextFetcher>,
    url_template: String,
    timeout: Duration,
}

impl LiveTemplateSource {
    pub fn new(fetcher: Arc<dyn TextFetcher>, url_template: impl Into<String>, timeout: Duration) -> Self {
        Self {
            fetcher,
            url_template: url_template.into(),
            timeout,
        }
    }

    pub fn url_for(&self, role: &str) -> String {
        self.url_template.replace(ROLE_PLACEHOLDER, role)
    }

    /// Fetches and parses live templates for `role`. Never fails; any problem
    /// is logged and yields an empty list.
    pub async fn fetch_templates(&self, role: &str, category: Option<Category>) -> Vec<ProjectTemplate> {
        let url = self.url_for(role);
        debug!("Fetching live templates from {url}");

        let text = match tokio::time::timeout(self.timeout, self.fetcher.fetch(&url)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("Live template fetch failed ({e}); falling back to local catalog");
                return Vec::new();
            }
            Err(_) => {
                let e = FetchError::Timeout(self.timeout);
                warn!("Live template fetch failed ({e}); falling back to local catalog");
                return Vec::new();
            }
        };

        let templates = parse_live_templates(&text, category.unwrap_or(Category::Fullstack));
        if templates.is_empty() {
            warn!("No live templates parsed from {url}; falling back to local catalog");
        } else {
            info!("Parsed {} live templates for role {role}", templates.len());
        }
        templates
    }
}

static MARKDOWN_LINK: Lazy<Option<Regex>> =
    Lazy::new(|| compile(r"\[([^\]\n]+)\]\((https?://[^)\s]+)\)"));
static HTML_ANCHOR: Lazy<Option<Regex>> = Lazy::new(|| {
    compile(r#"(?is)<a\s[^>]*?href\s*=\s*["'](https?://[^"']+)["'][^>]*>(.*?)</a>"#)
});
static HTML_TAG: Lazy<Option<Regex>> = Lazy::new(|| compile(r"<[^>]+>"));

fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .map_err(|e| tracing::error!("invalid live template pattern: {e}"))
        .ok()
}

/// Title keywords that place a template at a difficulty. Advanced is checked first.
const ADVANCED_KEYWORDS: &[&str] = &[
    "advanced", "production", "distributed", "scalable", "compiler", "microservice",
    "kubernetes", "clone",
];
const BEGINNER_KEYWORDS: &[&str] = &[
    "beginner", "simple", "basic", "intro", "starter", "first", "todo", "calculator",
];

/// Title keywords to skill. Keywords match whole words only.
const TITLE_SKILLS: &[(&[&str], &str)] = &[
    (&["api", "apis"], "REST API"),
    (&["auth", "authentication", "login", "oauth"], "Authentication"),
    (&["chat", "real-time", "realtime"], "WebSockets"),
    (&["dashboard", "dashboards", "visualization", "visualizer"], "Data Visualization"),
    (&["database", "sql"], "SQL"),
    (&["docker"], "Docker"),
    (&["kubernetes"], "Kubernetes"),
    (&["pipeline", "pipelines"], "CI/CD"),
    (&["test", "tests", "testing"], "Testing"),
    (&["react"], "React"),
    (&["responsive", "landing page"], "Responsive Design"),
    (&["scraper", "crawler"], "Web Scraping"),
    (&["classifier", "prediction", "machine learning"], "Machine Learning"),
    (&["cache", "caching"], "Caching"),
    (&["queue", "queues"], "Message Queues"),
];

static TITLE_SKILL_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    TITLE_SKILLS
        .iter()
        .filter_map(|(keywords, skill)| {
            let alternatives: Vec<String> = keywords.iter().map(|k| regex::escape(k)).collect();
            compile(&format!(r"\b(?:{})\b", alternatives.join("|"))).map(|re| (re, *skill))
        })
        .collect()
});

fn category_tech_stack(category: Category) -> &'static [&'static str] {
    match category {
        Category::Frontend => &["HTML", "CSS", "JavaScript", "React"],
        Category::Backend => &["Node.js", "Express", "PostgreSQL"],
        Category::Fullstack => &["React", "Node.js", "PostgreSQL"],
        Category::Devops => &["Docker", "Kubernetes", "GitHub Actions"],
        Category::Data => &["Python", "Pandas", "SQL"],
        Category::Mobile => &["React Native", "TypeScript"],
        Category::Ml => &["Python", "scikit-learn", "PyTorch"],
    }
}

fn category_skills(category: Category) -> &'static [&'static str] {
    match category {
        Category::Frontend => &["HTML", "CSS", "JavaScript"],
        Category::Backend => &["REST API", "SQL"],
        Category::Fullstack => &["React", "Node.js", "REST API"],
        Category::Devops => &["Docker", "CI/CD"],
        Category::Data => &["Python", "SQL"],
        Category::Mobile => &["React Native"],
        Category::Ml => &["Python", "Machine Learning"],
    }
}

fn time_estimate_for(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Beginner => "a weekend",
        Difficulty::Intermediate => "1 week",
        Difficulty::Advanced => "2-3 weeks",
    }
}

pub fn infer_difficulty(title: &str) -> Difficulty {
    let title = title.to_lowercase();
    if ADVANCED_KEYWORDS.iter().any(|k| title.contains(k)) {
        Difficulty::Advanced
    } else if BEGINNER_KEYWORDS.iter().any(|k| title.contains(k)) {
        Difficulty::Beginner
    } else {
        Difficulty::Intermediate
    }
}

pub fn infer_skills(title: &str, category: Category) -> Vec<String> {
    let lower = title.to_lowercase();
    let skills: Vec<&str> = TITLE_SKILL_PATTERNS
        .iter()
        .filter(|(pattern, _)| pattern.is_match(&lower))
        .map(|(_, skill)| *skill)
        .chain(category_skills(category).iter().copied())
        .collect();
    dedupe_skills(&skills)
}

/// Lowercase ASCII alphanumerics joined by single hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn clean_title(raw: &str) -> String {
    let stripped = match &*HTML_TAG {
        Some(tag) => tag.replace_all(raw, " ").into_owned(),
        None => raw.to_string(),
    };
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Every `(position, title, url)` link in document order.
fn scan_links(text: &str) -> Vec<(usize, String, String)> {
    let mut links = Vec::new();
    if let Some(markdown) = &*MARKDOWN_LINK {
        for caps in markdown.captures_iter(text) {
            if let (Some(whole), Some(title), Some(url)) = (caps.get(0), caps.get(1), caps.get(2)) {
                links.push((whole.start(), clean_title(title.as_str()), url.as_str().to_string()));
            }
        }
    }
    if let Some(anchor) = &*HTML_ANCHOR {
        for caps in anchor.captures_iter(text) {
            if let (Some(whole), Some(url), Some(title)) = (caps.get(0), caps.get(1), caps.get(2)) {
                links.push((whole.start(), clean_title(title.as_str()), url.as_str().to_string()));
            }
        }
    }
    links.sort_by_key(|(position, _, _)| *position);
    links
}

/// Parses fetched text into templates for `category`. Links whose title is
/// too short, too long, or slugs to nothing are skipped; repeated ids keep the first.
pub fn parse_live_templates(text: &str, category: Category) -> Vec<ProjectTemplate> {
    let mut seen = HashSet::new();
    let mut templates = Vec::new();

    for (_, title, url) in scan_links(text) {
        let length = title.chars().count();
        if !(MIN_TITLE_LEN..=MAX_TITLE_LEN).contains(&length) {
            continue;
        }
        let slug = slugify(&title);
        if slug.is_empty() {
            continue;
        }
        let id = format!("{LIVE_ID_PREFIX}{slug}");
        if !seen.insert(id.clone()) {
            continue;
        }

        let difficulty = infer_difficulty(&title);
        templates.push(ProjectTemplate {
            id,
            name: title.clone(),
            description: format!("Community {} project idea: {title}", category.as_str()),
            tech_stack: category_tech_stack(category)
                .iter()
                .map(|s| s.to_string())
                .collect(),
            difficulty,
            time_estimate: time_estimate_for(difficulty).to_string(),
            skills_taught: infer_skills(&title, category),
            category,
            features: vec![],
            learning_resources: vec![LearningResource { title, url }],
        });
    }

    templates
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockFetcher {
        response: Result<&'static str, u16>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl MockFetcher {
        fn ok(body: &'static str) -> Self {
            Self {
                response: Ok(body),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }

        fn status(status: u16) -> Self {
            Self {
                response: Err(status),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TextFetcher for MockFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match self.response {
                Ok(body) => Ok(body.to_string()),
                Err(status) => Err(FetchError::Status {
                    status,
                    url: url.to_string(),
                }),
            }
        }
    }

    const PAGE: &str = r#"
# Backend projects
- [Simple URL Shortener API](https://example.com/url-shortener)
- [Distributed Job Queue](https://example.com/job-queue)
<li><a class="p" href="https://example.com/chat">Real-time <b>Chat</b> Server</a></li>
- [Simple URL Shortener API](https://example.com/duplicate)
- [x](https://example.com/too-short)
"#;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Real-time Chat Server!"), "real-time-chat-server");
        assert_eq!(slugify("  C++ / Rust  "), "c-rust");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn test_parse_markdown_and_html_in_document_order() {
        let templates = parse_live_templates(PAGE, Category::Backend);
        let ids: Vec<&str> = templates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "live-simple-url-shortener-api",
                "live-distributed-job-queue",
                "live-real-time-chat-server",
            ]
        );
        assert_eq!(templates[2].name, "Real-time Chat Server");
        assert_eq!(templates[2].learning_resources[0].url, "https://example.com/chat");
    }

    #[test]
    fn test_field_inference() {
        let templates = parse_live_templates(PAGE, Category::Backend);
        let shortener = &templates[0];
        assert_eq!(shortener.difficulty, Difficulty::Beginner);
        assert_eq!(shortener.time_estimate, "a weekend");
        assert_eq!(shortener.category, Category::Backend);
        assert_eq!(shortener.tech_stack, vec!["Node.js", "Express", "PostgreSQL"]);
        assert_eq!(shortener.skills_taught, vec!["REST API", "SQL"]);

        let queue = &templates[1];
        assert_eq!(queue.difficulty, Difficulty::Advanced);
        assert!(queue.skills_taught.contains(&"Message Queues".to_string()));

        let chat = &templates[2];
        assert_eq!(chat.difficulty, Difficulty::Intermediate);
        assert_eq!(chat.skills_taught[0], "WebSockets");
    }

    #[test]
    fn test_title_skills_match_whole_words_only() {
        let author = infer_skills("Author Bio Page", Category::Frontend);
        assert!(!author.contains(&"Authentication".to_string()));
        assert_eq!(author, vec!["HTML", "CSS", "JavaScript"]);

        assert!(!infer_skills("Latest News Reader", Category::Frontend).contains(&"Testing".to_string()));
        assert!(!infer_skills("Rapid Color Picker", Category::Frontend).contains(&"REST API".to_string()));

        let login = infer_skills("OAuth Login Flow with Tests", Category::Frontend);
        assert_eq!(login[..2], ["Authentication", "Testing"]);
    }

    #[test]
    fn test_garbage_parses_to_nothing() {
        assert!(parse_live_templates("<html><body>nothing here</body></html>", Category::Data).is_empty());
        assert!(parse_live_templates("", Category::Data).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_substitutes_role_and_parses() {
        let fetcher = Arc::new(MockFetcher::ok(PAGE));
        let source = LiveTemplateSource::new(
            fetcher.clone(),
            "https://example.com/projects/{role}",
            Duration::from_secs(1),
        );
        assert_eq!(source.url_for("backend"), "https://example.com/projects/backend");
        let templates = source.fetch_templates("backend", Some(Category::Backend)).await;
        assert_eq!(templates.len(), 3);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_error_yields_empty() {
        let source = LiveTemplateSource::new(
            Arc::new(MockFetcher::status(503)),
            "https://example.com/{role}",
            Duration::from_secs(1),
        );
        assert!(source.fetch_templates("backend", None).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_timeout_yields_empty() {
        let fetcher = MockFetcher {
            delay: Duration::from_secs(60),
            ..MockFetcher::ok(PAGE)
        };
        let source = LiveTemplateSource::new(
            Arc::new(fetcher),
            "https://example.com/{role}",
            Duration::from_millis(100),
        );
        assert!(source.fetch_templates("backend", None).await.is_empty());
    }
}
