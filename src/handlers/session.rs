use crate::{errors::ServiceError, state::AppState};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

// ===== REQUEST DTOs =====

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOutRequest {
    #[serde(default)]
    pub clear_token: bool,
}

// ===== RESPONSE DTOs =====

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

// ===== HANDLERS =====

/// POST /jwt
/// Sign the posted JSON object and set it as the `Token` cookie
#[instrument(skip(state, payload), fields(service = "/jwt"))]
pub async fn issue_token(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let Json(payload) = payload.map_err(|e| ServiceError::InvalidPayload(e.body_text()))?;

    let issued = state.tokens.issue(payload)?;

    info!(
        exp = issued.claims.exp,
        claims = issued.claims.payload.len(),
        "Session token issued"
    );

    Ok((
        [(header::SET_COOKIE, state.tokens.session_cookie(&issued.token))],
        Json(SuccessResponse { success: true }),
    )
        .into_response())
}

/// POST /signOut
/// Clear the `Token` cookie when `clearToken` is true; always answers
#[instrument(skip(state, body), fields(service = "/signOut"))]
pub async fn sign_out(
    State(state): State<AppState>,
    body: Option<Json<SignOutRequest>>,
) -> Response {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    if !request.clear_token {
        info!("Sign-out requested without clearToken, leaving cookie untouched");
        return Json(SuccessResponse { success: false }).into_response();
    }

    info!("Clearing session cookie");

    (
        [(header::SET_COOKIE, state.tokens.clear_cookie())],
        Json(SuccessResponse { success: true }),
    )
        .into_response()
}
