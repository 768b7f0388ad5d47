pub mod listing;

pub use listing::{DEFAULT_PAGE_SIZE, ListingParams, count_products, list_products};
