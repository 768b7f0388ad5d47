#[allow(clippy::module_inception)]
pub mod constants;
pub mod types;

pub use constants::{ADMIN_DB, ProductFields};
pub use types::DbConfig;
