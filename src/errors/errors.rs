use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for the listing service
#[derive(Debug)]
pub enum ServiceError {
    // Session Token Errors
    MissingToken,
    InvalidToken,
    TokenExpired,
    TokenSigningFailed(String),

    // Request Errors
    InvalidPayload(String),
    InvalidQuery {
        parameter: String,
        reason: String,
    },
    ValidationError(String),

    // Database Errors
    DatabaseError(String),
    DatabaseConnectionError,

    // Startup Errors
    ConfigurationError(String),
}

/// Error response structure sent to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::MissingToken => write!(f, "Session token is required"),
            ServiceError::InvalidToken => write!(f, "Session token is invalid"),
            ServiceError::TokenExpired => write!(f, "Session token has expired"),
            ServiceError::TokenSigningFailed(msg) => {
                write!(f, "Failed to sign session token: {}", msg)
            }

            ServiceError::InvalidPayload(msg) => write!(f, "Invalid payload: {}", msg),
            ServiceError::InvalidQuery { parameter, reason } => {
                write!(f, "Invalid query parameter '{}': {}", parameter, reason)
            }
            ServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),

            ServiceError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ServiceError::DatabaseConnectionError => write!(f, "Failed to connect to database"),

            ServiceError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ServiceError {
    /// Shorthand for a malformed query parameter
    pub fn invalid_query(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        ServiceError::InvalidQuery {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 401 Unauthorized
            ServiceError::MissingToken | ServiceError::InvalidToken | ServiceError::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }

            // 400 Bad Request
            ServiceError::InvalidPayload(_)
            | ServiceError::InvalidQuery { .. }
            | ServiceError::ValidationError(_) => StatusCode::BAD_REQUEST,

            // 503 Service Unavailable
            ServiceError::DatabaseConnectionError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            ServiceError::TokenSigningFailed(_)
            | ServiceError::DatabaseError(_)
            | ServiceError::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::MissingToken => "MISSING_TOKEN",
            ServiceError::InvalidToken => "INVALID_TOKEN",
            ServiceError::TokenExpired => "TOKEN_EXPIRED",
            ServiceError::TokenSigningFailed(_) => "TOKEN_SIGNING_FAILED",

            ServiceError::InvalidPayload(_) => "INVALID_PAYLOAD",
            ServiceError::InvalidQuery { .. } => "INVALID_QUERY",
            ServiceError::ValidationError(_) => "VALIDATION_ERROR",

            ServiceError::DatabaseError(_) => "DATABASE_ERROR",
            ServiceError::DatabaseConnectionError => "DATABASE_CONNECTION_ERROR",

            ServiceError::ConfigurationError(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Convert error to JSON details for response
    pub fn to_details(&self) -> Option<serde_json::Value> {
        match self {
            ServiceError::InvalidQuery { parameter, reason } => Some(serde_json::json!({
                "parameter": parameter,
                "reason": reason
            })),
            _ => None,
        }
    }
}

/// Implement IntoResponse for Axum integration
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                details: self.to_details(),
            },
        };

        (status, Json(error_response)).into_response()
    }
}

/// Build an error response outside of a handler (middleware short-circuits)
pub fn create_error_response(
    status: StatusCode,
    code: &str,
    message: &str,
    request_id: Option<String>,
) -> Response {
    let error_response = ErrorResponse {
        error: ErrorDetail {
            code: code.to_string(),
            message: message.to_string(),
            details: request_id.map(|id| serde_json::json!({ "request_id": id })),
        },
    };

    (status, Json(error_response)).into_response()
}

/// Conversion from MongoDB driver errors
impl From<mongodb::error::Error> for ServiceError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match *err.kind {
            ErrorKind::ServerSelection { .. } | ErrorKind::DnsResolve { .. } => {
                ServiceError::DatabaseConnectionError
            }
            _ => ServiceError::DatabaseError(err.to_string()),
        }
    }
}

/// Conversion from validation errors
impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

/// Conversion from token decoding errors
impl From<jsonwebtoken::errors::Error> for ServiceError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
            _ => ServiceError::InvalidToken,
        }
    }
}

/// Type alias for Results using ServiceError
pub type ServiceResult<T> = Result<T, ServiceError>;
