#[allow(clippy::module_inception)]
pub mod listing_query;

pub use listing_query::{
    DEFAULT_PRICE_CEILING, ListingQuery, ListingQueryBuilder, PriceRange, PriceSort, ProductFilter,
    SortDirection, SortField, SortKey, TimeSort,
};
