use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::{
    datalayer::db_ops::constants::DbConfig,
    errors::{ServiceError, ServiceResult},
};

pub const DEFAULT_PORT: u16 = 5000;

/// Deployment flavour, selects the cookie flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
    Production,
    Development,
}

impl RuntimeMode {
    pub fn is_production(self) -> bool {
        matches!(self, RuntimeMode::Production)
    }
}

impl FromStr for RuntimeMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("production") {
            Ok(RuntimeMode::Production)
        } else {
            Ok(RuntimeMode::Development)
        }
    }
}

/// Session token settings
#[derive(Clone)]
pub struct AuthConfig {
    pub token_key: String,
    pub mode: RuntimeMode,
    /// Guard `/products` and `/count` with the session cookie
    pub require_auth: bool,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_key", &"<redacted>")
            .field("mode", &self.mode)
            .field("require_auth", &self.require_auth)
            .finish()
    }
}

/// Process configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub db: DbConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> ServiceResult<Self> {
        let token_key = env::var("TOKEN_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ServiceError::ConfigurationError("TOKEN_KEY must be set".into()))?;

        let mode = env::var("APP_ENV")
            .or_else(|_| env::var("NODE_ENV"))
            .map(|value| value.parse().unwrap_or(RuntimeMode::Development))
            .unwrap_or(RuntimeMode::Development);

        Ok(Self {
            port: try_load("PORT", DEFAULT_PORT)?,
            db: DbConfig::default(),
            auth: AuthConfig {
                token_key,
                mode,
                require_auth: try_load("REQUIRE_AUTH", false)?,
            },
        })
    }
}

fn try_load<T>(key: &str, default: T) -> ServiceResult<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e| {
            warn!("Invalid {key} value: {e}");
            ServiceError::ConfigurationError(format!("invalid {key}: {e}"))
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_mode_parsing() {
        assert_eq!(
            "production".parse::<RuntimeMode>().unwrap(),
            RuntimeMode::Production
        );
        assert_eq!(
            " PRODUCTION ".parse::<RuntimeMode>().unwrap(),
            RuntimeMode::Production
        );
        assert_eq!(
            "staging".parse::<RuntimeMode>().unwrap(),
            RuntimeMode::Development
        );
        assert!(!RuntimeMode::Development.is_production());
    }

    #[test]
    fn test_auth_config_debug_hides_key() {
        let auth = AuthConfig {
            token_key: "super-secret".into(),
            mode: RuntimeMode::Production,
            require_auth: false,
        };

        let rendered = format!("{:?}", auth);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("Production"));
    }
}
