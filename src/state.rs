use std::sync::Arc;

use crate::clients::Catalog;
use crate::clients::openlibrary::OpenLibraryClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, BookService, PasswordAuthService, SeaOrmBookService};

/// Build the HTTP client used for catalog calls.
fn build_shared_http_client(config: &Config) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(
            config.catalog.request_timeout_seconds,
        ))
        .user_agent(config.catalog.user_agent.clone())
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub book_service: Arc<dyn BookService>,

    pub auth_service: Arc<dyn AuthService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(&config)?;
        let catalog = Arc::new(OpenLibraryClient::with_shared_client(
            http_client,
            &config.catalog,
        )) as Arc<dyn Catalog>;

        Self::with_catalog(config, catalog).await
    }

    /// Wires the services around an arbitrary catalog implementation.
    pub async fn with_catalog(config: Config, catalog: Arc<dyn Catalog>) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let book_service = Arc::new(SeaOrmBookService::new(store.clone(), catalog))
            as Arc<dyn BookService + Send + Sync + 'static>;

        let auth_service = Arc::new(PasswordAuthService::new(&config.security))
            as Arc<dyn AuthService + Send + Sync + 'static>;

        Ok(Self {
            config: Arc::new(config),
            store,
            book_service,
            auth_service,
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
