//! Claim-set assembly for access tokens.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::Claims;
use crate::domain::entities::user::User;

use super::config::TokenServiceConfig;

/// Assembles the identity claim set for an authenticated user
///
/// Pure component: no I/O, no error conditions. Deterministic except for the
/// `jti`, which is freshly random on every call.
#[derive(Debug, Clone)]
pub struct ClaimsBuilder {
    issuer: String,
    audience: String,
    access_token_minutes: i64,
}

impl ClaimsBuilder {
    /// Creates a builder from the token service configuration
    pub fn new(config: &TokenServiceConfig) -> Self {
        Self {
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_token_minutes: config.access_token_minutes,
        }
    }

    /// Builds the claim set for a freshly authenticated user
    pub fn build(&self, user: &User, roles: &[String]) -> Claims {
        let now = Utc::now();
        let expiry = now + Duration::minutes(self.access_token_minutes);

        Claims {
            sub: user.username.clone(),
            email: user.email.clone(),
            uid: user.id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiry.timestamp(),
            roles: roles.to_vec(),
        }
    }

    /// Rebuilds a claim set from a verified (possibly expired) token
    ///
    /// Carries subject, email, user id and roles; restamps the time claims
    /// and mints a fresh `jti` so the reissued token is distinguishable from
    /// the one it replaces.
    pub fn reissue(&self, claims: &Claims) -> Claims {
        let now = Utc::now();
        let expiry = now + Duration::minutes(self.access_token_minutes);

        Claims {
            sub: claims.sub.clone(),
            email: claims.email.clone(),
            uid: claims.uid.clone(),
            jti: Uuid::new_v4().to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiry.timestamp(),
            roles: claims.roles.clone(),
        }
    }
}
