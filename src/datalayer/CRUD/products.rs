use crate::{
    datalayer::{CRUD::listing_query::ListingQuery, db_ops::DbManager},
    errors::{ServiceError, ServiceResult},
};
use async_trait::async_trait;
use bson::Document;
use futures::TryStreamExt;
use mongodb::Collection;
use tracing::{debug, error, instrument};

/// Read access to the product collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Documents matching the query's filter, ordered and windowed.
    /// Prices are compared numerically whether stored as numbers or strings.
    async fn find_products(&self, query: &ListingQuery) -> ServiceResult<Vec<Document>>;

    /// Collection size from metadata, not an exact count
    async fn estimated_count(&self) -> ServiceResult<u64>;
}

/// MongoDB-backed product store
#[derive(Clone)]
pub struct MongoProductStore {
    collection: Collection<Document>,
}

impl MongoProductStore {
    pub fn new(db: &DbManager) -> Self {
        Self {
            collection: db.products(),
        }
    }
}

#[async_trait]
impl ProductStore for MongoProductStore {
    #[instrument(skip(self), fields(collection = %self.collection.name()))]
    async fn find_products(&self, query: &ListingQuery) -> ServiceResult<Vec<Document>> {
        let pipeline = query.to_pipeline();

        debug!(
            stages = pipeline.len(),
            skip = query.skip,
            limit = query.limit,
            "Querying products"
        );

        let cursor = self.collection.aggregate(pipeline).await.map_err(|e| {
            error!(error = %e, "Failed to query products");
            ServiceError::from(e)
        })?;

        let products: Vec<Document> = cursor.try_collect().await.map_err(|e| {
            error!(error = %e, "Failed to read product cursor");
            ServiceError::from(e)
        })?;

        Ok(products)
    }

    #[instrument(skip(self), fields(collection = %self.collection.name()))]
    async fn estimated_count(&self) -> ServiceResult<u64> {
        self.collection
            .estimated_document_count()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to count products");
                ServiceError::from(e)
            })
    }
}

/// Stand-in used when no MongoDB client could be built at startup; every
/// call reports the database as unreachable.
#[derive(Debug, Clone)]
pub struct UnavailableProductStore {
    reason: String,
}

impl UnavailableProductStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ProductStore for UnavailableProductStore {
    async fn find_products(&self, _query: &ListingQuery) -> ServiceResult<Vec<Document>> {
        error!(reason = %self.reason, "Product listing requested without a database client");
        Err(ServiceError::DatabaseConnectionError)
    }

    async fn estimated_count(&self) -> ServiceResult<u64> {
        error!(reason = %self.reason, "Product count requested without a database client");
        Err(ServiceError::DatabaseConnectionError)
    }
}
