//! Token lifecycle service: access-token issuance and refresh-token generation.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

use crate::domain::entities::token::Claims;
use crate::domain::entities::user::User;
use crate::errors::{ConfigError, DomainError};

use super::claims::ClaimsBuilder;
use super::config::TokenServiceConfig;
use super::signer::TokenSigner;

/// Entropy of an opaque refresh token, in bytes (172 chars once base64-encoded)
pub const REFRESH_TOKEN_BYTES: usize = 128;

/// Service owning the token-production algorithm
///
/// Issues signed access tokens and opaque refresh tokens. Holds no state
/// beyond its immutable configuration; persisted refresh-token state belongs
/// to the `UserRepository`.
pub struct TokenService {
    signer: TokenSigner,
    claims_builder: ClaimsBuilder,
    config: TokenServiceConfig,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// Fails with a `ConfigError` if the configuration is invalid; callers
    /// are expected to treat this as fatal at startup.
    pub fn new(config: TokenServiceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let signer = TokenSigner::new(&config)?;
        let claims_builder = ClaimsBuilder::new(&config);

        Ok(Self {
            signer,
            claims_builder,
            config,
        })
    }

    /// Issues a signed access token for an authenticated user
    ///
    /// # Returns
    /// The compact token string and its absolute expiry.
    pub fn issue_access_token(&self, user: &User) -> Result<(String, DateTime<Utc>), DomainError> {
        let claims = self.claims_builder.build(user, &user.roles);
        let token = self.signer.sign(&claims)?;
        let expiration = expiry_from_claims(&claims);

        Ok((token, expiration))
    }

    /// Reissues an access token from the claims of a verified expired token
    pub fn reissue_access_token(
        &self,
        claims: &Claims,
    ) -> Result<(String, DateTime<Utc>), DomainError> {
        let reissued = self.claims_builder.reissue(claims);
        let token = self.signer.sign(&reissued)?;
        let expiration = expiry_from_claims(&reissued);

        Ok((token, expiration))
    }

    /// Generates an opaque, high-entropy refresh token
    ///
    /// Not a structured token: 128 bytes from a cryptographically secure
    /// random source, base64-encoded.
    pub fn generate_refresh_token(&self) -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        BASE64_STANDARD.encode(bytes)
    }

    /// Computes the absolute expiry for a refresh token issued now
    pub fn refresh_token_expiry(&self) -> DateTime<Utc> {
        Utc::now() + Duration::minutes(self.config.refresh_token_minutes)
    }

    /// Verifies an access token for normal request authentication
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        self.signer.verify(token)
    }

    /// Verifies an access token's signature for the refresh flow
    ///
    /// The token may be expired; only authenticity is checked.
    pub fn verify_for_refresh(&self, token: &str) -> Result<Claims, DomainError> {
        self.signer.verify_signature_only(token)
    }
}

fn expiry_from_claims(claims: &Claims) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now)
}
