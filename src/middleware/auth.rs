use crate::{
    controllayer::session::token_from_cookie_header,
    errors::{ServiceError, create_error_response},
    middleware::request_id::get_request_id,
    state::AppState,
};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

/// Session verification middleware
/// Reads the `Token` cookie, verifies it and stores the decoded
/// [`SessionClaims`](crate::controllayer::session::SessionClaims) in the
/// request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let request_id = get_request_id(&request).map(|id| id.to_string());

    let reject = |err: ServiceError| {
        create_error_response(
            err.status_code(),
            err.error_code(),
            &err.to_string(),
            request_id.clone(),
        )
    };

    let token = request
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(token_from_cookie_header)
        .map(str::to_string)
        .ok_or_else(|| {
            tracing::warn!(path = %request.uri().path(), "Session cookie missing");
            reject(ServiceError::MissingToken)
        })?;

    let claims = state.tokens.verify(&token).map_err(reject)?;

    tracing::info!(
        exp = claims.exp,
        path = %request.uri().path(),
        "Session token verified"
    );

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
