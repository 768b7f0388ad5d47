use axum::{extract::Request, middleware::Next, response::Response};

use crate::middleware::request_id::get_request_id;

/// Logs every request that ends in a 4xx/5xx with its route and request ID
pub async fn error_handling_middleware(request: Request, next: Next) -> Response {
    let request_id = get_request_id(&request);
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            status = %status,
            method = %method,
            path = %path,
            request_id = ?request_id,
            "Request failed"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            status = %status,
            method = %method,
            path = %path,
            request_id = ?request_id,
            "Request rejected"
        );
    }

    response
}
