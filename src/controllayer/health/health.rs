use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};

/// Liveness text, byte-for-byte what existing clients already see
pub const LIVENESS_MESSAGE: &str = "Server is running----------";

/// Liveness response; `status` mirrors the HTTP status for existing clients
#[derive(Debug, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: u16,
    pub message: String,
}

/// Liveness probe endpoint
///
/// Returns 200 OK with a fixed message while the process is serving
pub async fn liveness() -> impl IntoResponse {
    let response = LivenessResponse {
        status: StatusCode::OK.as_u16(),
        message: LIVENESS_MESSAGE.to_string(),
    };

    (StatusCode::OK, Json(response))
}
