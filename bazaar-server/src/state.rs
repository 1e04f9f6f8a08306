//! Application state for bazaar-server

use std::sync::Arc;
use std::time::Duration;

use shared::{AttributeDefinitionStore, AttributeValueStore, DegradeMode, MemoryStore, Resolver};

use crate::config::Config;
use crate::db::PgStore;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Definition store (schema side)
    pub definitions: Arc<dyn AttributeDefinitionStore>,
    /// Value store (data side)
    pub values: Arc<dyn AttributeValueStore>,
    /// Upper bound on each store read during resolution
    pub read_timeout: Duration,
    pub degrade_mode: DegradeMode,
}

impl AppState {
    /// Create state from configuration, connecting to PostgreSQL when configured
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let state = match &config.database_url {
            Some(url) => {
                let store = PgStore::connect(url).await?;
                tracing::info!("Attribute stores backed by PostgreSQL");
                Self::with_stores(Arc::new(store.clone()), Arc::new(store))
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory attribute store");
                Self::in_memory(MemoryStore::new())
            }
        };
        Ok(state
            .with_read_timeout(config.read_timeout)
            .with_degrade_mode(config.degrade_mode))
    }

    pub fn with_stores(
        definitions: Arc<dyn AttributeDefinitionStore>,
        values: Arc<dyn AttributeValueStore>,
    ) -> Self {
        Self {
            definitions,
            values,
            read_timeout: Duration::from_millis(2000),
            degrade_mode: DegradeMode::Silent,
        }
    }

    /// Both stores backed by one in-memory store
    pub fn in_memory(store: MemoryStore) -> Self {
        Self::with_stores(Arc::new(store.clone()), Arc::new(store))
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub fn with_degrade_mode(mut self, degrade_mode: DegradeMode) -> Self {
        self.degrade_mode = degrade_mode;
        self
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self.definitions.as_ref(), self.values.as_ref())
            .with_read_timeout(self.read_timeout)
    }
}
