pub const DEFAULT_DB_HOST: &str = "cluster0.bu1vbif.mongodb.net";
pub const DEFAULT_APP_NAME: &str = "Cluster0";
pub const DEFAULT_DB_NAME: &str = "carDB";
pub const DEFAULT_COLLECTION: &str = "products";

/// Database used for the connectivity ping
pub const ADMIN_DB: &str = "admin";

/// Field names of the product documents; the collection uses human-readable keys
#[allow(non_snake_case)]
pub mod ProductFields {
    pub const NAME: &str = "Product Name";
    pub const CATEGORY: &str = "Category";
    pub const PRICE: &str = "Price";
    pub const CREATED_AT: &str = "Product Creation Date and Time";
}
