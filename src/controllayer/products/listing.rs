use crate::{
    datalayer::CRUD::{
        ProductStore,
        listing_query::{ListingQuery, ListingQueryBuilder, PriceRange, PriceSort, TimeSort},
    },
    errors::{ServiceError, ServiceResult},
    handlers::products::{CountResponse, ListProductsQuery},
};
use bson::Bson;
use serde_json::Value;
use std::str::FromStr;
use tracing::{info, instrument};
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Typed listing parameters, parsed and validated before any query is built
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ListingParams {
    pub page: u64,
    #[validate(range(max = 1000))]
    pub size: u64,
    pub search: Option<String>,
    pub brand_filter: Option<String>,
    pub category_filter: Option<String>,
    pub price_filter: Option<PriceRange>,
    pub price_sort: Option<PriceSort>,
    pub time_sort: Option<TimeSort>,
}

impl Default for ListingParams {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            search: None,
            brand_filter: None,
            category_filter: None,
            price_filter: None,
            price_sort: None,
            time_sort: None,
        }
    }
}

// Empty query values behave as if the parameter was never sent.
fn present(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

fn parse_count(parameter: &str, raw: &Option<String>, default: u64) -> ServiceResult<u64> {
    match present(raw) {
        Some(value) => value.parse::<u64>().map_err(|_| {
            ServiceError::invalid_query(
                parameter,
                format!("expected a non-negative integer, got '{}'", value),
            )
        }),
        None => Ok(default),
    }
}

fn parse_keyword<T>(raw: &Option<String>) -> ServiceResult<Option<T>>
where
    T: FromStr<Err = ServiceError>,
{
    present(raw).map(|value| value.parse::<T>()).transpose()
}

impl ListingParams {
    /// Parse the raw query string values
    pub fn from_query(query: &ListProductsQuery) -> ServiceResult<Self> {
        let params = Self {
            page: parse_count("page", &query.page, 0)?,
            size: parse_count("size", &query.size, DEFAULT_PAGE_SIZE)?,
            search: present(&query.search).map(str::to_string),
            brand_filter: present(&query.brand_filter).map(str::to_string),
            category_filter: present(&query.category_filter).map(str::to_string),
            price_filter: parse_keyword(&query.price_filter)?,
            price_sort: parse_keyword(&query.price_sort)?,
            time_sort: parse_keyword(&query.time_sort)?,
        };

        params.validate()?;

        Ok(params)
    }

    /// Resolve into the typed filter/sort/window
    pub fn to_query(&self) -> ServiceResult<ListingQuery> {
        ListingQueryBuilder::new()
            .paginate(self.page, self.size)
            .search(self.search.clone())
            .brand_filter(self.brand_filter.clone())
            .category_filter(self.category_filter.clone())
            .price_range(self.price_filter)
            .price_sort(self.price_sort)
            .time_sort(self.time_sort)
            .build()
    }
}

/// List one page of products as relaxed extended JSON documents
#[instrument(skip(store), fields(service = "/products"))]
pub async fn list_products(
    store: &dyn ProductStore,
    params: ListingParams,
) -> ServiceResult<Vec<Value>> {
    if params.size == 0 {
        return Ok(Vec::new());
    }

    let query = params.to_query()?;

    info!(
        skip = query.skip,
        limit = query.limit,
        filtered = !query.filter.is_empty(),
        sorted = !query.sort.is_empty(),
        "Listing products"
    );

    let documents = store.find_products(&query).await?;

    Ok(documents
        .into_iter()
        .map(|document| to_client_json(Bson::Document(document)))
        .collect())
}

/// Plain JSON for clients: ObjectIds as hex strings, dates as RFC 3339,
/// everything else as relaxed extended JSON
pub fn to_client_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::DateTime(date) => match date.try_to_rfc3339_string() {
            Ok(rendered) => Value::String(rendered),
            Err(_) => Bson::DateTime(date).into_relaxed_extjson(),
        },
        Bson::Document(document) => Value::Object(
            document
                .into_iter()
                .map(|(key, value)| (key, to_client_json(value)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(to_client_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// Approximate number of products in the collection
#[instrument(skip(store), fields(service = "/count"))]
pub async fn count_products(store: &dyn ProductStore) -> ServiceResult<CountResponse> {
    let count = store.estimated_count().await?;

    info!(count, "Counted products");

    Ok(CountResponse { count })
}
