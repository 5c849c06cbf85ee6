use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LIVE_FETCH_TIMEOUT_MS: u64 = 3000;
const DEFAULT_EXTRACTION_TASK_TIMEOUT_MS: u64 = 5000;
const DEFAULT_EXTRACTION_MAX_CONCURRENCY: usize = 8;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed numbers fail startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Overrides the built-in role taxonomy.
    pub role_taxonomy_path: Option<PathBuf>,
    /// Overrides the built-in project template catalog.
    pub project_catalog_path: Option<PathBuf>,
    /// Live template URL with a `{role}` placeholder. Unset disables live-merge.
    pub live_templates_url: Option<String>,
    pub live_fetch_timeout: Duration,
    pub extraction_task_timeout: Duration,
    pub extraction_max_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            rust_log: "info".to_string(),
            role_taxonomy_path: None,
            project_catalog_path: None,
            live_templates_url: None,
            live_fetch_timeout: Duration::from_millis(DEFAULT_LIVE_FETCH_TIMEOUT_MS),
            extraction_task_timeout: Duration::from_millis(DEFAULT_EXTRACTION_TASK_TIMEOUT_MS),
            extraction_max_concurrency: DEFAULT_EXTRACTION_MAX_CONCURRENCY,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Config {
            port: parse_or(get("PORT"), "PORT", DEFAULT_PORT)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            role_taxonomy_path: get("ROLE_TAXONOMY_PATH").map(PathBuf::from),
            project_catalog_path: get("PROJECT_CATALOG_PATH").map(PathBuf::from),
            live_templates_url: get("LIVE_TEMPLATES_URL"),
            live_fetch_timeout: Duration::from_millis(parse_or(
                get("LIVE_FETCH_TIMEOUT_MS"),
                "LIVE_FETCH_TIMEOUT_MS",
                DEFAULT_LIVE_FETCH_TIMEOUT_MS,
            )?),
            extraction_task_timeout: Duration::from_millis(parse_or(
                get("EXTRACTION_TASK_TIMEOUT_MS"),
                "EXTRACTION_TASK_TIMEOUT_MS",
                DEFAULT_EXTRACTION_TASK_TIMEOUT_MS,
            )?),
            extraction_max_concurrency: parse_or(
                get("EXTRACTION_MAX_CONCURRENCY"),
                "EXTRACTION_MAX_CONCURRENCY",
                DEFAULT_EXTRACTION_MAX_CONCURRENCY,
            )?,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
