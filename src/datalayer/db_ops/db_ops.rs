use crate::{
    datalayer::db_ops::constants::{ADMIN_DB, DbConfig},
    errors::ServiceResult,
};
use bson::{Document, doc};
use mongodb::{
    Client, Collection,
    options::{ClientOptions, ServerApi, ServerApiVersion},
};
use tracing::{error, info};

/// MongoDB client holder, one per process
#[derive(Clone)]
pub struct DbManager {
    client: Client,
    config: DbConfig,
}

impl DbManager {
    /// Builds the client. The driver connects lazily, so this only fails on a
    /// malformed URI or an SRV lookup failure.
    pub async fn new(config: DbConfig) -> ServiceResult<Self> {
        info!(
            host = %config.host,
            database = %config.db_name,
            collection = %config.collection,
            "Initializing MongoDB client..."
        );

        let mut options = ClientOptions::parse(config.connection_uri())
            .await
            .map_err(|e| {
                error!("Failed to parse MongoDB connection string: {}", e);
                e
            })?;

        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        let client = Client::with_options(options)?;

        info!("MongoDB client created successfully");

        Ok(Self { client, config })
    }

    /// Handle to the product collection
    pub fn products(&self) -> Collection<Document> {
        self.client
            .database(&self.config.db_name)
            .collection::<Document>(&self.config.collection)
    }

    /// Health check - pings the deployment through the admin database
    pub async fn health_check(&self) -> ServiceResult<DatabaseHealth> {
        let start = std::time::Instant::now();

        self.client
            .database(ADMIN_DB)
            .run_command(doc! { "ping": 1 })
            .await?;

        let latency = start.elapsed();

        Ok(DatabaseHealth {
            latency_ms: latency.as_millis() as u64,
            database: self.config.db_name.clone(),
        })
    }

    /// Test database connection and log the round trip
    pub async fn test_connection(&self) -> ServiceResult<()> {
        info!("Testing database connection...");

        let health = self.health_check().await?;

        info!(
            latency_ms = health.latency_ms,
            database = %health.database,
            "Pinged your deployment. You successfully connected to MongoDB!"
        );

        Ok(())
    }

    /// Graceful shutdown - closes pooled connections
    pub async fn shutdown(&self) {
        info!("Shutting down MongoDB client...");
        self.client.clone().shutdown().await;
        info!("MongoDB client closed");
    }
}

/// Result of a successful ping
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DatabaseHealth {
    pub latency_ms: u64,
    pub database: String,
}

/// Initialize database connection at application startup.
///
/// A failed ping is logged and tolerated: the returned manager keeps its
/// client and individual requests fail until the deployment is reachable.
pub async fn initialize_database(config: DbConfig) -> ServiceResult<DbManager> {
    info!("=== Database Initialization Started ===");

    let db_manager = DbManager::new(config).await?;

    if let Err(e) = db_manager.test_connection().await {
        error!(error = %e, "MongoDB ping failed, continuing without a verified connection");
    }

    info!("=== Database Initialization Completed ===");

    Ok(db_manager)
}
