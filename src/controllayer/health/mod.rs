#[allow(clippy::module_inception)]
pub mod health;

pub use health::{LIVENESS_MESSAGE, LivenessResponse, liveness};
