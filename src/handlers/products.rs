use crate::{
    controllayer::products::{self as listing, ListingParams},
    errors::ServiceError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

// ===== REQUEST DTOs =====

/// Raw `/products` query string; values are parsed into [`ListingParams`]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    pub page: Option<String>,
    pub size: Option<String>,
    pub search: Option<String>,
    pub brand_filter: Option<String>,
    pub category_filter: Option<String>,
    pub price_filter: Option<String>,
    pub price_sort: Option<String>,
    pub time_sort: Option<String>,
}

// ===== RESPONSE DTOs =====

#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

// ===== HANDLERS =====

/// GET /products
/// One page of products, optionally filtered and sorted
#[instrument(skip(state, query), fields(service = "/products"))]
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ListProductsQuery>, QueryRejection>,
) -> Result<Json<Vec<Value>>, ServiceError> {
    let Query(query) =
        query.map_err(|e| ServiceError::invalid_query("query", e.body_text()))?;

    let params = ListingParams::from_query(&query)?;
    let products = listing::list_products(state.products.as_ref(), params).await?;

    Ok(Json(products))
}

/// GET /count
/// Approximate number of products in the collection
#[instrument(skip(state), fields(service = "/count"))]
pub async fn count_products(
    State(state): State<AppState>,
) -> Result<Json<CountResponse>, ServiceError> {
    let response = listing::count_products(state.products.as_ref()).await?;

    Ok(Json(response))
}
