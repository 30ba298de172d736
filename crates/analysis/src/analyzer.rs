use crate::analysis::{derive, Analysis};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use strategist_model::World;
use strategist_snapshot::{load_snapshot, load_snapshot_bytes, DecodeOptions, SnapshotGraph};
use strategist_templates::{TemplateCatalog, TemplateStore};
use tokio::sync::OnceCell;

/// Entry point tying decode, normalization and derivation together.
///
/// The template catalog is loaded on first use and shared by every later
/// analysis. A failed catalog load is not remembered.
pub struct Analyzer {
    store: Arc<TemplateStore>,
    config: AnalysisConfig,
    catalog: OnceCell<Arc<TemplateCatalog>>,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("config", &self.config)
            .field("catalog_loaded", &self.catalog.initialized())
            .finish_non_exhaustive()
    }
}

impl Analyzer {
    pub fn new(store: Arc<TemplateStore>, config: AnalysisConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|message| AnalysisError::InvalidConfig { message })?;
        Ok(Self {
            store,
            config,
            catalog: OnceCell::new(),
        })
    }

    /// Analyzer over the data directory named by the environment.
    pub fn from_env(config: AnalysisConfig) -> Result<Self> {
        Self::new(Arc::new(TemplateStore::from_env()?), config)
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub async fn catalog(&self) -> Result<Arc<TemplateCatalog>> {
        let catalog = self
            .catalog
            .get_or_try_init(|| async {
                let started = Instant::now();
                let catalog = TemplateCatalog::load(&self.store).await?;
                log::info!("Template catalog loaded in {:?}", started.elapsed());
                Ok::<_, AnalysisError>(Arc::new(catalog))
            })
            .await?;
        Ok(Arc::clone(catalog))
    }

    pub async fn analyze_bytes(&self, bytes: &[u8], options: &DecodeOptions) -> Result<Analysis> {
        let graph = load_snapshot_bytes(bytes, options)?;
        self.analyze_graph(&graph).await
    }

    pub async fn analyze_file(&self, path: &Path, options: &DecodeOptions) -> Result<Analysis> {
        log::info!("Analyzing {}", path.display());
        let graph = load_snapshot(path, options).await?;
        self.analyze_graph(&graph).await
    }

    async fn analyze_graph(&self, graph: &SnapshotGraph) -> Result<Analysis> {
        let catalog = self.catalog().await?;
        let started = Instant::now();
        let world = World::normalize(graph, &catalog)?;
        let analysis = derive(&world, &catalog, &self.config);
        log::debug!("Derivation took {:?}", started.elapsed());
        Ok(analysis)
    }
}
