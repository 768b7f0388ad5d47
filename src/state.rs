use crate::{
    config::AppConfig,
    controllayer::session::TokenService,
    datalayer::{
        CRUD::{MongoProductStore, ProductStore, UnavailableProductStore},
        initialize_database,
    },
};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Product collection access
    pub products: Arc<dyn ProductStore>,
    /// Session token signer/verifier
    pub tokens: TokenService,
}

impl AppState {
    /// Assemble state around an existing product store
    pub fn new(config: AppConfig, products: Arc<dyn ProductStore>) -> Self {
        let tokens = TokenService::new(&config.auth);

        Self {
            config: Arc::new(config),
            products,
            tokens,
        }
    }

    /// Connect to MongoDB and build the process state.
    /// Database problems never abort startup; see [`UnavailableProductStore`].
    pub async fn initialize(config: AppConfig) -> Self {
        let products: Arc<dyn ProductStore> = match initialize_database(config.db.clone()).await {
            Ok(db) => Arc::new(MongoProductStore::new(&db)),
            Err(e) => {
                tracing::error!(error = %e, "MongoDB client could not be created, serving without a database");
                Arc::new(UnavailableProductStore::new(e.to_string()))
            }
        };

        Self::new(config, products)
    }
}
