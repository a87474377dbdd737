use std::sync::Arc;
use std::time::Duration;

use shopseo_core::generation::DescriptionGenerator;
use shopseo_core::options::OptionsCatalog;
use shopseo_db::ShopRepository;

use crate::config::ServerConfig;
use crate::gateway::OptimizationGateway;
use crate::preferences::PreferenceStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend (Postgres or in-memory).
    pub repo: Arc<dyn ShopRepository>,
    pub preferences: Arc<PreferenceStore>,
    pub gateway: Arc<OptimizationGateway>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire the services together. `generation_timeout` bounds every
    /// generator call; optimize-all batches are bounded by
    /// `config.optimize_all_timeout_secs`.
    pub fn new(
        repo: Arc<dyn ShopRepository>,
        generator: Arc<dyn DescriptionGenerator>,
        catalog: OptionsCatalog,
        config: ServerConfig,
        generation_timeout: Duration,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let preferences = Arc::new(PreferenceStore::new(
            Arc::clone(&repo),
            Arc::clone(&catalog),
        ));
        let gateway = Arc::new(OptimizationGateway::new(
            Arc::clone(&repo),
            Arc::clone(&preferences),
            generator,
            generation_timeout,
            Duration::from_secs(config.optimize_all_timeout_secs),
            config.optimize_all_concurrency,
        ));
        Self {
            repo,
            preferences,
            gateway,
            config: Arc::new(config),
        }
    }
}
