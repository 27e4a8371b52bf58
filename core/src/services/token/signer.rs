//! JWT signing and verification primitive.

use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::token::Claims;
use crate::errors::{ConfigError, DomainError, TokenError};

use super::config::TokenServiceConfig;

/// Signs and verifies access tokens with a symmetric secret
///
/// The signer accepts a single fixed algorithm (HS256). Verification comes in
/// two modes: full (signature, expiry, not-before) for normal request
/// authentication, and signature-only for the refresh flow, where an expired
/// but authentic token must still be trusted for identity extraction.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    relaxed_validation: Validation,
}

impl TokenSigner {
    /// Creates a new signer from the token service configuration
    ///
    /// Fails with `ConfigError::MissingSecret` if the secret is absent or
    /// empty; this is a fatal startup condition.
    pub fn new(config: &TokenServiceConfig) -> Result<Self, ConfigError> {
        if config.secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        // Signature-only mode for the refresh flow: expiry, not-before and
        // audience checks are deliberately skipped
        let mut relaxed_validation = Validation::new(Algorithm::HS256);
        relaxed_validation.validate_exp = false;
        relaxed_validation.validate_nbf = false;
        relaxed_validation.validate_aud = false;
        relaxed_validation.required_spec_claims.clear();

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            relaxed_validation,
        })
    }

    /// Encodes and signs a claim set into a compact token string
    pub fn sign(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(Algorithm::HS256);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Verifies a token fully: signature, expiry and not-before
    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        self.check_algorithm(token)?;

        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(map_decode_error)?;

        Ok(token_data.claims)
    }

    /// Verifies a token's signature while ignoring expiry
    ///
    /// Exists solely to support the refresh flow; never use this for normal
    /// request authentication.
    pub fn verify_signature_only(&self, token: &str) -> Result<Claims, DomainError> {
        self.check_algorithm(token)?;

        let token_data = decode::<Claims>(token, &self.decoding_key, &self.relaxed_validation)
            .map_err(map_decode_error)?;

        Ok(token_data.claims)
    }

    /// Rejects tokens whose header advertises any algorithm other than HS256
    ///
    /// Defends against algorithm-substitution attacks: the tag in the token
    /// must match the single algorithm this system accepts.
    fn check_algorithm(&self, token: &str) -> Result<(), DomainError> {
        let header = decode_header(token)
            .map_err(|_| DomainError::Token(TokenError::MalformedToken))?;

        if header.alg != Algorithm::HS256 {
            return Err(DomainError::Token(TokenError::TamperedToken));
        }

        Ok(())
    }
}

fn map_decode_error(error: jsonwebtoken::errors::Error) -> DomainError {
    use jsonwebtoken::errors::ErrorKind;

    let token_error = match error.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::TamperedToken,
        ErrorKind::ExpiredSignature => TokenError::TokenExpired,
        ErrorKind::ImmatureSignature => TokenError::TokenNotYetValid,
        _ => TokenError::MalformedToken,
    };

    DomainError::Token(token_error)
}
