#![allow(dead_code)]

use std::{
    cmp::Ordering,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use bson::{Bson, Document};
use car_listing_backend::{
    config::{AppConfig, AuthConfig, RuntimeMode},
    datalayer::{
        CRUD::{
            ProductStore,
            listing_query::{ListingQuery, SortDirection, SortField},
        },
        db_ops::constants::{DbConfig, ProductFields},
    },
    errors::ServiceResult,
    routes::create_router,
    state::AppState,
};
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_TOKEN_KEY: &str = "integration-test-signing-key";

/// Product store that evaluates the typed listing query in memory
pub struct InMemoryProductStore {
    products: Vec<Document>,
    last_query: Mutex<Option<ListingQuery>>,
}

impl InMemoryProductStore {
    pub fn new(products: Vec<Document>) -> Self {
        Self {
            products,
            last_query: Mutex::new(None),
        }
    }

    pub fn last_query(&self) -> Option<ListingQuery> {
        self.last_query.lock().unwrap().clone()
    }
}

fn contains_ignore_case(document: &Document, field: &str, term: &str) -> bool {
    document
        .get_str(field)
        .map(|value| value.to_lowercase().contains(&term.to_lowercase()))
        .unwrap_or(false)
}

fn numeric(document: &Document, field: &str) -> Option<f64> {
    match document.get(field)? {
        Bson::Int32(value) => Some(f64::from(*value)),
        Bson::Int64(value) => Some(*value as f64),
        Bson::Double(value) => Some(*value),
        Bson::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}

fn matches(query: &ListingQuery, document: &Document) -> bool {
    let filter = &query.filter;

    if let Some(name) = &filter.name {
        if !contains_ignore_case(document, ProductFields::NAME, name) {
            return false;
        }
    }

    if let Some(category) = &filter.category {
        if !contains_ignore_case(document, ProductFields::CATEGORY, category) {
            return false;
        }
    }

    if let Some(range) = &filter.price {
        match numeric(document, ProductFields::PRICE) {
            Some(price) if range.contains(price) => {}
            _ => return false,
        }
    }

    true
}

fn compare(query: &ListingQuery, a: &Document, b: &Document) -> Ordering {
    for key in &query.sort {
        let ordering = match key.field {
            SortField::Price => numeric(a, ProductFields::PRICE)
                .partial_cmp(&numeric(b, ProductFields::PRICE))
                .unwrap_or(Ordering::Equal),
            SortField::CreatedAt => a
                .get_str(ProductFields::CREATED_AT)
                .ok()
                .cmp(&b.get_str(ProductFields::CREATED_AT).ok()),
        };

        let ordering = match key.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    Ordering::Equal
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find_products(&self, query: &ListingQuery) -> ServiceResult<Vec<Document>> {
        *self.last_query.lock().unwrap() = Some(query.clone());

        let mut selected: Vec<Document> = self
            .products
            .iter()
            .filter(|document| matches(query, document))
            .cloned()
            .collect();

        selected.sort_by(|a, b| compare(query, a, b));

        Ok(selected
            .into_iter()
            .skip(query.skip as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn estimated_count(&self) -> ServiceResult<u64> {
        Ok(self.products.len() as u64)
    }
}

fn product(name: &str, category: &str, price: i32, created_at: &str) -> Document {
    let mut document = Document::new();
    document.insert(ProductFields::NAME, name);
    document.insert(ProductFields::CATEGORY, category);
    document.insert(ProductFields::PRICE, price);
    document.insert(ProductFields::CREATED_AT, created_at);
    document
}

/// Fixture inventory in natural (insertion) order
pub fn sample_products() -> Vec<Document> {
    vec![
        product("Toyota Corolla", "Sedan", 18000, "2024-01-05T10:00:00Z"),
        product("Honda Civic", "Sedan", 21000, "2023-11-20T09:30:00Z"),
        product("Toyota RAV4", "SUV", 28500, "2024-03-14T16:45:00Z"),
        product("Ford F-150", "Truck", 35000, "2022-08-01T08:00:00Z"),
        product("Car Cover Deluxe", "Accessories", 120, "2024-02-10T12:00:00Z"),
        product("Toyota Floor Mats", "Accessories", 480, "2023-06-30T18:20:00Z"),
        product("Tesla Roadster", "Sports", 250000, "2024-05-01T07:15:00Z"),
        product("Wiper Blades", "Accessories", 35, "2021-12-12T11:11:00Z"),
        string_priced(
            "Leather Seat Covers",
            "Accessories",
            "450",
            "2023-09-09T14:00:00Z",
        ),
    ]
}

// Some imported documents carry the price as text
fn string_priced(name: &str, category: &str, price: &str, created_at: &str) -> Document {
    let mut document = product(name, category, 0, created_at);
    document.insert(ProductFields::PRICE, price);
    document
}

pub fn test_config(mode: RuntimeMode, require_auth: bool) -> AppConfig {
    AppConfig {
        port: 0,
        db: DbConfig {
            uri: Some("mongodb://localhost:27017".to_string()),
            user: String::new(),
            password: String::new(),
            host: "localhost".to_string(),
            app_name: "tests".to_string(),
            db_name: "carDB".to_string(),
            collection: "products".to_string(),
        },
        auth: AuthConfig {
            token_key: TEST_TOKEN_KEY.to_string(),
            mode,
            require_auth,
        },
    }
}

pub fn test_state(store: Arc<dyn ProductStore>) -> AppState {
    AppState::new(test_config(RuntimeMode::Development, false), store)
}

/// Router over the sample inventory
pub fn test_router() -> Router {
    create_router(test_state(Arc::new(InMemoryProductStore::new(
        sample_products(),
    ))))
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Product names of a listing response, in order
pub fn names(listing: &Value) -> Vec<String> {
    listing
        .as_array()
        .unwrap()
        .iter()
        .map(|product| product[ProductFields::NAME].as_str().unwrap().to_string())
        .collect()
}

pub fn prices(listing: &Value) -> Vec<f64> {
    listing
        .as_array()
        .unwrap()
        .iter()
        .map(|product| match &product[ProductFields::PRICE] {
            Value::String(price) => price.parse().unwrap(),
            price => price.as_f64().unwrap(),
        })
        .collect()
}
