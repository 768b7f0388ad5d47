use crate::{
    datalayer::db_ops::constants::ProductFields,
    errors::{ServiceError, ServiceResult},
};
use bson::{Bson, Document, doc};
use std::str::FromStr;

/// Upper price bound used when `priceFilter` carries only a minimum
pub const DEFAULT_PRICE_CEILING: f64 = 200_000.0;

/* ----------------------------- SORT KEYWORDS ----------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn as_bson(self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Price,
    CreatedAt,
}

impl SortField {
    pub fn field_name(self) -> &'static str {
        match self {
            SortField::Price => ProductFields::PRICE,
            SortField::CreatedAt => ProductFields::CREATED_AT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

/// `priceSort` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSort {
    Low,
    High,
}

impl FromStr for PriceSort {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(PriceSort::Low),
            "high" => Ok(PriceSort::High),
            other => Err(ServiceError::invalid_query(
                "priceSort",
                format!("expected 'low' or 'high', got '{}'", other),
            )),
        }
    }
}

impl PriceSort {
    fn direction(self) -> SortDirection {
        match self {
            PriceSort::Low => SortDirection::Ascending,
            PriceSort::High => SortDirection::Descending,
        }
    }
}

/// `timeSort` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSort {
    New,
    Old,
}

impl FromStr for TimeSort {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(TimeSort::New),
            "old" => Ok(TimeSort::Old),
            other => Err(ServiceError::invalid_query(
                "timeSort",
                format!("expected 'new' or 'old', got '{}'", other),
            )),
        }
    }
}

impl TimeSort {
    // Existing clients rely on "new" meaning ascending creation time.
    fn direction(self) -> SortDirection {
        match self {
            TimeSort::New => SortDirection::Ascending,
            TimeSort::Old => SortDirection::Descending,
        }
    }
}

/* ----------------------------- PRICE RANGE ----------------------------- */

/// Inclusive price bounds parsed from `"min"` or `"min-max"`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

fn parse_bound(raw: &str) -> ServiceResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| {
            ServiceError::invalid_query("priceFilter", format!("'{}' is not a number", raw))
        })
}

impl FromStr for PriceRange {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();

        let (min, max) = match parts.as_slice() {
            [min] => (parse_bound(min)?, DEFAULT_PRICE_CEILING),
            [min, max] if max.trim().is_empty() => (parse_bound(min)?, DEFAULT_PRICE_CEILING),
            [min, max] => (parse_bound(min)?, parse_bound(max)?),
            _ => {
                return Err(ServiceError::invalid_query(
                    "priceFilter",
                    "expected 'min' or 'min-max'",
                ));
            }
        };

        if min > max {
            return Err(ServiceError::invalid_query(
                "priceFilter",
                format!("minimum {} exceeds maximum {}", min, max),
            ));
        }

        Ok(PriceRange { min, max })
    }
}

/* ----------------------------- TYPED QUERY ----------------------------- */

/// Predicate over product documents. Text terms are case-insensitive substrings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<PriceRange>,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.price.is_none()
    }
}

/// Fully resolved listing request: predicate, ordering and window
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub filter: ProductFilter,
    pub sort: Vec<SortKey>,
    pub skip: u64,
    pub limit: u64,
}

/// Temporary field holding the converted price while sorting
const NUMERIC_PRICE_FIELD: &str = "__numericPrice";

/// `Price` as a double; unconvertible or missing values become null
fn numeric_price() -> Document {
    doc! {
        "$convert": {
            "input": format!("${}", ProductFields::PRICE),
            "to": "double",
            "onError": Bson::Null,
            "onNull": Bson::Null,
        }
    }
}

fn substring_match(term: &str) -> Document {
    doc! {
        "$regex": regex::escape(term),
        "$options": "i",
    }
}

impl ListingQuery {
    /// No filter and no ordering, only the page window applies
    pub fn is_pagination_only(&self) -> bool {
        self.filter.is_empty() && self.sort.is_empty()
    }

    /// Render the predicate as a MongoDB filter document
    pub fn to_filter_document(&self) -> Document {
        let mut filter = Document::new();

        if let Some(name) = &self.filter.name {
            filter.insert(ProductFields::NAME, substring_match(name));
        }

        if let Some(category) = &self.filter.category {
            filter.insert(ProductFields::CATEGORY, substring_match(category));
        }

        // Prices are stored as numbers or numeric strings
        if let Some(range) = &self.filter.price {
            filter.insert(
                "$expr",
                doc! {
                    "$and": [
                        { "$gte": [numeric_price(), Bson::Double(range.min)] },
                        { "$lte": [numeric_price(), Bson::Double(range.max)] },
                    ]
                },
            );
        }

        filter
    }

    fn sorts_by_price(&self) -> bool {
        self.sort.iter().any(|key| key.field == SortField::Price)
    }

    /// Render the ordering; `None` leaves the collection's natural order.
    /// Price keys refer to the converted field added by [`Self::to_pipeline`].
    pub fn to_sort_document(&self) -> Option<Document> {
        if self.sort.is_empty() {
            return None;
        }

        let mut sort = Document::new();
        for key in &self.sort {
            let field = match key.field {
                SortField::Price => NUMERIC_PRICE_FIELD,
                SortField::CreatedAt => key.field.field_name(),
            };
            sort.insert(field, key.direction.as_bson());
        }

        Some(sort)
    }

    /// Aggregation pipeline: match, order, window
    pub fn to_pipeline(&self) -> Vec<Document> {
        let mut pipeline = vec![doc! { "$match": self.to_filter_document() }];

        let by_price = self.sorts_by_price();
        if by_price {
            let mut converted = Document::new();
            converted.insert(NUMERIC_PRICE_FIELD, numeric_price());
            pipeline.push(doc! { "$addFields": converted });
        }

        if let Some(sort) = self.to_sort_document() {
            pipeline.push(doc! { "$sort": sort });
        }

        if self.skip > 0 {
            pipeline.push(doc! { "$skip": to_i64(self.skip) });
        }

        if self.limit > 0 {
            pipeline.push(doc! { "$limit": to_i64(self.limit) });
        }

        if by_price {
            let mut hidden = Document::new();
            hidden.insert(NUMERIC_PRICE_FIELD, 0);
            pipeline.push(doc! { "$project": hidden });
        }

        pipeline
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/* ----------------------------- FLUENT BUILDER ----------------------------- */

/// Collects listing parameters in request order and resolves them into a
/// [`ListingQuery`]. `search` and `brand_filter` both target the product name,
/// so whichever is applied last wins.
#[derive(Debug, Clone, Default)]
pub struct ListingQueryBuilder {
    page: u64,
    size: u64,
    name: Option<String>,
    category: Option<String>,
    price: Option<PriceRange>,
    price_sort: Option<PriceSort>,
    time_sort: Option<TimeSort>,
}

impl ListingQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paginate(mut self, page: u64, size: u64) -> Self {
        self.page = page;
        self.size = size;
        self
    }

    pub fn search(mut self, term: Option<String>) -> Self {
        if term.is_some() {
            self.name = term;
        }
        self
    }

    pub fn brand_filter(mut self, brand: Option<String>) -> Self {
        if brand.is_some() {
            self.name = brand;
        }
        self
    }

    pub fn category_filter(mut self, category: Option<String>) -> Self {
        if category.is_some() {
            self.category = category;
        }
        self
    }

    pub fn price_range(mut self, range: Option<PriceRange>) -> Self {
        if range.is_some() {
            self.price = range;
        }
        self
    }

    pub fn price_sort(mut self, sort: Option<PriceSort>) -> Self {
        if sort.is_some() {
            self.price_sort = sort;
        }
        self
    }

    pub fn time_sort(mut self, sort: Option<TimeSort>) -> Self {
        if sort.is_some() {
            self.time_sort = sort;
        }
        self
    }

    pub fn build(self) -> ServiceResult<ListingQuery> {
        let skip = self.page.checked_mul(self.size).ok_or_else(|| {
            ServiceError::invalid_query("page", "page * size overflows the document offset")
        })?;

        let mut sort = Vec::new();
        if let Some(price_sort) = self.price_sort {
            sort.push(SortKey {
                field: SortField::Price,
                direction: price_sort.direction(),
            });
        }
        if let Some(time_sort) = self.time_sort {
            sort.push(SortKey {
                field: SortField::CreatedAt,
                direction: time_sort.direction(),
            });
        }

        Ok(ListingQuery {
            filter: ProductFilter {
                name: self.name,
                category: self.category,
                price: self.price,
            },
            sort,
            skip,
            limit: self.size,
        })
    }
}
