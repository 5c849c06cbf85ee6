use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::recommendations::catalog::ProjectCatalog;
use crate::recommendations::engine::RecommendationEngine;
use crate::recommendations::live::{HttpTextFetcher, LiveTemplateSource};
use crate::skills::extraction::{DependencySkillExtractor, ExtractionExecutor};
use crate::skills::gap::SkillGapAnalyzer;
use crate::skills::taxonomy::RoleTaxonomy;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub analyzer: SkillGapAnalyzer,
    pub engine: RecommendationEngine,
    pub extractor: ExtractionExecutor,
}

impl AppState {
    /// Loads reference data and wires the collaborators named by `config`.
    pub fn from_config(config: Config) -> Result<Self> {
        let taxonomy = RoleTaxonomy::load(config.role_taxonomy_path.as_deref())
            .context("Failed to load role taxonomy")?;
        info!(
            "Role taxonomy v{} loaded ({} roles)",
            taxonomy.version,
            taxonomy.len()
        );

        let catalog = ProjectCatalog::load(config.project_catalog_path.as_deref())
            .context("Failed to load project catalog")?;
        info!("Project catalog loaded ({} templates)", catalog.len());

        let live = match &config.live_templates_url {
            Some(url) => {
                let fetcher = HttpTextFetcher::new(config.live_fetch_timeout)
                    .context("Failed to build HTTP client for live templates")?;
                info!("Live template merge enabled ({url})");
                Some(LiveTemplateSource::new(
                    Arc::new(fetcher),
                    url.clone(),
                    config.live_fetch_timeout,
                ))
            }
            None => {
                info!("Live template merge disabled");
                None
            }
        };

        let extractor = ExtractionExecutor::new(
            Arc::new(DependencySkillExtractor),
            config.extraction_task_timeout,
            config.extraction_max_concurrency,
        );

        Ok(Self {
            analyzer: SkillGapAnalyzer::new(Arc::new(taxonomy)),
            engine: RecommendationEngine::new(Arc::new(catalog), live),
            extractor,
            config,
        })
    }
}
