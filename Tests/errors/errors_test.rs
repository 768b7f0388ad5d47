#[cfg(test)]
mod error_tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use car_listing_backend::errors::errors::{
        ErrorDetail, ErrorResponse, ServiceError, ServiceResult, create_error_response,
    };
    use serde_json;

    // Test error display messages
    #[test]
    fn test_error_display_messages() {
        let error = ServiceError::MissingToken;
        assert_eq!(error.to_string(), "Session token is required");

        let error = ServiceError::invalid_query("page", "expected a non-negative integer");
        assert_eq!(
            error.to_string(),
            "Invalid query parameter 'page': expected a non-negative integer"
        );

        let error = ServiceError::InvalidPayload("token payload must be a JSON object".into());
        assert_eq!(
            error.to_string(),
            "Invalid payload: token payload must be a JSON object"
        );

        let error = ServiceError::DatabaseConnectionError;
        assert_eq!(error.to_string(), "Failed to connect to database");
    }

    // Test HTTP status codes
    #[test]
    fn test_session_error_status_codes() {
        assert_eq!(
            ServiceError::MissingToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::InvalidToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::TokenExpired.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::TokenSigningFailed("bad key".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_bad_request_status_codes() {
        assert_eq!(
            ServiceError::invalid_query("priceFilter", "expected 'min' or 'min-max'").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::ValidationError("size too large".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::InvalidPayload("not an object".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_server_error_status_codes() {
        assert_eq!(
            ServiceError::DatabaseError("cursor killed".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::ConfigurationError("TOKEN_KEY must be set".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::DatabaseConnectionError.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    // Test error codes
    #[test]
    fn test_error_codes() {
        assert_eq!(ServiceError::MissingToken.error_code(), "MISSING_TOKEN");
        assert_eq!(ServiceError::TokenExpired.error_code(), "TOKEN_EXPIRED");
        assert_eq!(
            ServiceError::invalid_query("size", "too big").error_code(),
            "INVALID_QUERY"
        );
        assert_eq!(
            ServiceError::DatabaseConnectionError.error_code(),
            "DATABASE_CONNECTION_ERROR"
        );
    }

    // Test error details
    #[test]
    fn test_invalid_query_details() {
        let error = ServiceError::invalid_query("priceFilter", "'abc' is not a number");

        let details = error.to_details().unwrap();
        assert_eq!(details["parameter"], "priceFilter");
        assert_eq!(details["reason"], "'abc' is not a number");
    }

    #[test]
    fn test_errors_without_details() {
        assert!(ServiceError::MissingToken.to_details().is_none());
        assert!(ServiceError::DatabaseConnectionError.to_details().is_none());
        assert!(
            ServiceError::ValidationError("size".to_string())
                .to_details()
                .is_none()
        );
    }

    // Test Axum response integration
    #[tokio::test]
    async fn test_into_response_body() {
        let response = ServiceError::invalid_query("page", "expected a non-negative integer")
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(error_response.error.code, "INVALID_QUERY");
        assert_eq!(
            error_response.error.details.unwrap()["parameter"],
            "page"
        );
    }

    #[test]
    fn test_into_response_unauthorized() {
        let response = ServiceError::InvalidToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_error_response_carries_request_id() {
        let response = create_error_response(
            StatusCode::UNAUTHORIZED,
            "MISSING_TOKEN",
            "Session token is required",
            Some("req-123".to_string()),
        );
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(error_response.error.code, "MISSING_TOKEN");
        assert_eq!(error_response.error.details.unwrap()["request_id"], "req-123");
    }

    // Test error response serialization
    #[test]
    fn test_error_response_serialization_skips_empty_details() {
        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: "INVALID_TOKEN".to_string(),
                message: "Session token is invalid".to_string(),
                details: None,
            },
        };

        let json = serde_json::to_string(&error_response).unwrap();
        assert!(json.contains("INVALID_TOKEN"));
        assert!(!json.contains("details"));
    }

    // Test conversions from library errors
    #[test]
    fn test_from_jwt_errors() {
        use jsonwebtoken::errors::{Error, ErrorKind};

        let expired: ServiceError = Error::from(ErrorKind::ExpiredSignature).into();
        assert!(matches!(expired, ServiceError::TokenExpired));

        let forged: ServiceError = Error::from(ErrorKind::InvalidSignature).into();
        assert!(matches!(forged, ServiceError::InvalidToken));
    }

    #[test]
    fn test_from_validation_errors() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("size", validator::ValidationError::new("range"));

        let error: ServiceError = errors.into();
        assert!(matches!(error, ServiceError::ValidationError(_)));
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    // Test ServiceResult type alias
    #[test]
    fn test_service_result_err() {
        let result: ServiceResult<u64> = Err(ServiceError::MissingToken);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().to_string(), "Session token is required");
    }

    // Test error code uniqueness
    #[test]
    fn test_error_code_uniqueness() {
        use std::collections::HashSet;

        let error_codes: Vec<&str> = vec![
            ServiceError::MissingToken.error_code(),
            ServiceError::InvalidToken.error_code(),
            ServiceError::TokenExpired.error_code(),
            ServiceError::TokenSigningFailed("test".to_string()).error_code(),
            ServiceError::InvalidPayload("test".to_string()).error_code(),
            ServiceError::invalid_query("test", "test").error_code(),
            ServiceError::ValidationError("test".to_string()).error_code(),
            ServiceError::DatabaseError("test".to_string()).error_code(),
            ServiceError::DatabaseConnectionError.error_code(),
            ServiceError::ConfigurationError("test".to_string()).error_code(),
        ];

        let unique_codes: HashSet<&str> = error_codes.iter().copied().collect();
        assert_eq!(
            error_codes.len(),
            unique_codes.len(),
            "Error codes must be unique"
        );
    }

    // Test that all errors implement Error trait
    #[test]
    fn test_error_trait_implementation() {
        let error: Box<dyn std::error::Error> = Box::new(ServiceError::InvalidToken);
        assert!(!error.to_string().is_empty());
    }
}
