use crate::controllayer::health::liveness as liveness_probe;
use axum::response::IntoResponse;
use tracing::{info, instrument};

/// GET /
/// Liveness message, delegates to the liveness probe in controllayer
#[instrument(fields(service = "/"))]
pub async fn liveness() -> impl IntoResponse {
    info!("Liveness request received");
    liveness_probe().await
}
