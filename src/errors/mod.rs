#[allow(clippy::module_inception)]
pub mod errors;

pub use errors::{ServiceError, ServiceResult, create_error_response};
