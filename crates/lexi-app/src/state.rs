use std::sync::Arc;

use lexi_config::Config;
use lexi_core::{KeyValueStore, Orchestrator, Repository};
use lexi_define::{DefineService, HttpDefineClient};
use lexi_io::FileStore;
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }
}

/// Everything that needs the persisted collections loaded first
pub struct Backend {
    pub orchestrator: Arc<Orchestrator>,
}

impl Backend {
    /// Open the on-disk store and load every collection
    pub async fn open(config: &Config) -> anyhow::Result<Self> {
        let store = FileStore::open(config.storage.store_path()).await?;
        let service = HttpDefineClient::new(config.service.endpoint.clone());
        tracing::info!("Define service endpoint: {}", service.endpoint());

        Ok(Self::with_parts(Arc::new(store), Arc::new(service), config).await)
    }

    pub async fn with_parts(
        store: Arc<dyn KeyValueStore>,
        service: Arc<dyn DefineService>,
        config: &Config,
    ) -> Self {
        let repository = Arc::new(Repository::open(store, &config.limits).await);
        let orchestrator = Orchestrator::new(repository, service, config.limits);

        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    pub fn repository(&self) -> &Arc<Repository> {
        self.orchestrator.repository()
    }
}
