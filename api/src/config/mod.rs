//! API configuration loaded from the environment.

use std::env;

use anyhow::Context;
use ca_shared::config::JwtConfig;

/// Runtime configuration for the API server
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// MySQL connection string
    pub database_url: String,
    /// JWT configuration
    pub jwt: JwtConfig,
}

impl ApiConfig {
    /// Loads configuration from environment variables
    ///
    /// `JWT_SECRET` and `DATABASE_URL` are required; everything else has a
    /// default. Lifetimes are given in minutes.
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid port number")?;

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let jwt = JwtConfig::new(secret)
            .with_access_token_minutes(env_minutes("JWT_ACCESS_TOKEN_MINUTES", 15)?)
            .with_refresh_token_minutes(env_minutes("JWT_REFRESH_TOKEN_MINUTES", 1440)?)
            .with_claims_metadata(
                env::var("JWT_ISSUER").unwrap_or_else(|_| "catalog-api".to_string()),
                env::var("JWT_AUDIENCE").unwrap_or_else(|_| "catalog-clients".to_string()),
            );

        Ok(Self {
            host,
            port,
            database_url,
            jwt,
        })
    }

    /// Socket address to bind the server to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_minutes(name: &str, default: i64) -> anyhow::Result<i64> {
    match env::var(name) {
        Ok(value) => value
            .parse::<i64>()
            .with_context(|| format!("{} must be an integer number of minutes", name)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_minutes_default() {
        assert_eq!(env_minutes("CA_TEST_UNSET_VARIABLE", 15).unwrap(), 15);
    }

    #[test]
    fn test_bind_address() {
        let config = ApiConfig {
            host: "0.0.0.0".to_string(),
            port: 9000,
            database_url: "mysql://localhost/catalog".to_string(),
            jwt: JwtConfig::new("secret"),
        };

        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }
}
