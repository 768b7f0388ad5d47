pub mod auth;
pub mod error;
pub mod request_id;

pub use auth::require_session;
pub use error::error_handling_middleware;
pub use request_id::{get_request_id, request_id_middleware};
