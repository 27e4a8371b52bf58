//! Configuration for the token service

use ca_shared::config::JwtConfig;

use crate::errors::ConfigError;

/// Configuration for the token service
///
/// Injected once at construction; never read from ambient state at call time.
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub secret: String,
    /// Access token lifetime in minutes
    pub access_token_minutes: i64,
    /// Refresh token lifetime in minutes
    pub refresh_token_minutes: i64,
    /// Issuer claim stamped into access tokens
    pub issuer: String,
    /// Audience claim stamped into access tokens
    pub audience: String,
}

impl TokenServiceConfig {
    /// Validates the configuration, failing fast on startup errors
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if self.access_token_minutes <= 0 {
            return Err(ConfigError::InvalidLifetime {
                field: "access_token_minutes".to_string(),
            });
        }
        if self.refresh_token_minutes <= 0 {
            return Err(ConfigError::InvalidLifetime {
                field: "refresh_token_minutes".to_string(),
            });
        }
        Ok(())
    }
}

impl From<JwtConfig> for TokenServiceConfig {
    fn from(config: JwtConfig) -> Self {
        Self {
            secret: config.secret,
            access_token_minutes: config.access_token_minutes,
            refresh_token_minutes: config.refresh_token_minutes,
            issuer: config.issuer,
            audience: config.audience,
        }
    }
}
