pub mod listing_query;
pub mod products;

pub use listing_query::{ListingQuery, ListingQueryBuilder};
pub use products::{MongoProductStore, ProductStore, UnavailableProductStore};
