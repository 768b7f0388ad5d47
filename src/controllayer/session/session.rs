//! Session tokens.
//!
//! `/jwt` signs whatever JSON object the client posts, adds `iat`/`exp` and
//! hands the result back as an HTTP-only `Token` cookie. Tokens are HS256 and
//! live for two hours. Cookie flags depend on the runtime mode: production
//! cookies are `Secure; SameSite=None` so a cross-site frontend can send them,
//! everything else gets `SameSite=Strict`.

use crate::{
    config::{AuthConfig, RuntimeMode},
    errors::{ServiceError, ServiceResult},
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub const TOKEN_COOKIE: &str = "Token";
pub const TOKEN_TTL_SECONDS: i64 = 2 * 60 * 60;

/// Claims carried by a session token: the caller's payload plus timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(flatten)]
    pub payload: Map<String, Value>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: SessionClaims,
}

/// Signs and verifies session tokens, and renders the cookie headers
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    mode: RuntimeMode,
}

impl TokenService {
    pub fn new(auth: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(auth.token_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(auth.token_key.as_bytes()),
            mode: auth.mode,
        }
    }

    /// Sign `payload` with a two hour expiry
    pub fn issue(&self, payload: Value) -> ServiceResult<IssuedToken> {
        self.issue_at(payload, Utc::now())
    }

    /// Sign `payload` as if issued at `now`
    pub fn issue_at(&self, payload: Value, now: DateTime<Utc>) -> ServiceResult<IssuedToken> {
        let mut payload = match payload {
            Value::Object(map) => map,
            other => {
                return Err(ServiceError::InvalidPayload(format!(
                    "token payload must be a JSON object, got {}",
                    json_kind(&other)
                )));
            }
        };

        // Timestamps are always ours
        payload.remove("iat");
        payload.remove("exp");

        let iat = now.timestamp();
        let claims = SessionClaims {
            payload,
            iat,
            exp: iat + TOKEN_TTL_SECONDS,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::TokenSigningFailed(e.to_string()))?;

        debug!(exp = claims.exp, "Session token issued");

        Ok(IssuedToken { token, claims })
    }

    /// Verify signature and expiry, returning the decoded claims
    pub fn verify(&self, token: &str) -> ServiceResult<SessionClaims> {
        decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                warn!(error = %e, "Session token rejected");
                ServiceError::from(e)
            })
    }

    /// `Set-Cookie` value carrying `token`
    pub fn session_cookie(&self, token: &str) -> String {
        self.format_cookie(token, TOKEN_TTL_SECONDS)
    }

    /// `Set-Cookie` value that removes the session cookie
    pub fn clear_cookie(&self) -> String {
        self.format_cookie("", 0)
    }

    fn format_cookie(&self, value: &str, max_age: i64) -> String {
        let flags = if self.mode.is_production() {
            "Secure; SameSite=None"
        } else {
            "SameSite=Strict"
        };

        format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; {}",
            TOKEN_COOKIE, value, max_age, flags
        )
    }
}

/// Pull the session token out of a `Cookie` request header
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service(mode: RuntimeMode) -> TokenService {
        TokenService::new(&AuthConfig {
            token_key: "test-signing-key".into(),
            mode,
            require_auth: false,
        })
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let tokens = service(RuntimeMode::Development);

        let issued = tokens.issue(json!({ "email": "a@b.com" })).unwrap();
        let claims = tokens.verify(&issued.token).unwrap();

        assert_eq!(claims.payload.get("email"), Some(&json!("a@b.com")));
        assert_eq!(claims.payload.len(), 1);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECONDS);
        assert_eq!(claims, issued.claims);
    }

    #[test]
    fn test_caller_timestamps_are_overwritten() {
        let tokens = service(RuntimeMode::Development);
        let now = Utc::now();

        let issued = tokens
            .issue_at(json!({ "email": "a@b.com", "exp": 1, "iat": 1 }), now)
            .unwrap();

        assert_eq!(issued.claims.iat, now.timestamp());
        assert_eq!(issued.claims.exp, now.timestamp() + TOKEN_TTL_SECONDS);
        assert!(tokens.verify(&issued.token).is_ok());
    }

    #[test]
    fn test_non_object_payload_rejected() {
        let tokens = service(RuntimeMode::Development);

        assert!(matches!(
            tokens.issue(json!("a@b.com")),
            Err(ServiceError::InvalidPayload(_))
        ));
        assert!(matches!(
            tokens.issue(json!([1, 2])),
            Err(ServiceError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = service(RuntimeMode::Development);
        let issued_at = Utc::now() - chrono::Duration::hours(3);

        let issued = tokens
            .issue_at(json!({ "email": "a@b.com" }), issued_at)
            .unwrap();

        assert!(matches!(
            tokens.verify(&issued.token),
            Err(ServiceError::TokenExpired)
        ));
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let issued = service(RuntimeMode::Development)
            .issue(json!({ "email": "a@b.com" }))
            .unwrap();

        let other = TokenService::new(&AuthConfig {
            token_key: "another-key".into(),
            mode: RuntimeMode::Development,
            require_auth: false,
        });

        assert!(matches!(
            other.verify(&issued.token),
            Err(ServiceError::InvalidToken)
        ));
        assert!(matches!(
            other.verify("not-a-jwt"),
            Err(ServiceError::InvalidToken)
        ));
    }

    #[test]
    fn test_cookie_flags_by_mode() {
        let dev = service(RuntimeMode::Development).session_cookie("abc");
        assert_eq!(
            dev,
            "Token=abc; Path=/; Max-Age=7200; HttpOnly; SameSite=Strict"
        );

        let prod = service(RuntimeMode::Production).session_cookie("abc");
        assert_eq!(
            prod,
            "Token=abc; Path=/; Max-Age=7200; HttpOnly; Secure; SameSite=None"
        );
    }

    #[test]
    fn test_clear_cookie_keeps_flags() {
        let cleared = service(RuntimeMode::Production).clear_cookie();
        assert_eq!(
            cleared,
            "Token=; Path=/; Max-Age=0; HttpOnly; Secure; SameSite=None"
        );
    }

    #[test]
    fn test_token_from_cookie_header() {
        assert_eq!(
            token_from_cookie_header("theme=dark; Token=abc.def.ghi; lang=en"),
            Some("abc.def.ghi")
        );
        assert_eq!(token_from_cookie_header("Token="), None);
        assert_eq!(token_from_cookie_header("MyToken=abc"), None);
        assert_eq!(token_from_cookie_header(""), None);
    }
}
