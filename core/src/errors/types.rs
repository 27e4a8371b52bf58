//! Error type definitions for authentication and token lifecycle operations.
//!
//! Credential and refresh failures deliberately carry only a coarse category:
//! the API layer must never reveal whether a username exists or which specific
//! check rejected a refresh attempt.

use ca_shared::types::ErrorResponse;
use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown username or wrong password; the two cases are indistinguishable
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Subject extracted from a verified token has no persisted session
    #[error("Unknown subject")]
    UnknownSubject,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Role already assigned")]
    RoleAlreadyAssigned,
}

/// Token-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Signature mismatch, or an algorithm tag other than the single
    /// accepted algorithm
    #[error("Token signature verification failed")]
    TamperedToken,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    /// Presented refresh token differs from the persisted value; covers both
    /// wrong tokens and already-rotated tokens
    #[error("Refresh token mismatch")]
    RefreshTokenMismatch,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Configuration errors, fatal at startup
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT signing secret is missing or empty")]
    MissingSecret,

    #[error("Invalid token lifetime: {field}")]
    InvalidLifetime { field: String },
}

/// Convert AuthError to ErrorResponse
impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        let error_code = match &err {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::UnknownSubject => "UNKNOWN_SUBJECT",
            AuthError::UserAlreadyExists => "USER_ALREADY_EXISTS",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::RoleAlreadyAssigned => "ROLE_ALREADY_ASSIGNED",
        };

        ErrorResponse::new(error_code, err.to_string())
    }
}

/// Convert TokenError to ErrorResponse
impl From<TokenError> for ErrorResponse {
    fn from(err: TokenError) -> Self {
        let error_code = match &err {
            TokenError::TamperedToken => "TAMPERED_TOKEN",
            TokenError::MalformedToken => "MALFORMED_TOKEN",
            TokenError::TokenExpired => "TOKEN_EXPIRED",
            TokenError::TokenNotYetValid => "TOKEN_NOT_YET_VALID",
            TokenError::RefreshTokenMismatch => "REFRESH_TOKEN_MISMATCH",
            TokenError::RefreshTokenExpired => "REFRESH_TOKEN_EXPIRED",
            TokenError::TokenGenerationFailed => "TOKEN_GENERATION_FAILED",
        };

        ErrorResponse::new(error_code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_is_coarse() {
        let message = AuthError::InvalidCredentials.to_string();

        // Must not distinguish unknown-user from wrong-password
        assert!(!message.contains("not found"));
        assert!(message.contains("Invalid username or password"));
    }

    #[test]
    fn test_token_error_conversion() {
        let response: ErrorResponse = TokenError::RefreshTokenMismatch.into();

        assert_eq!(response.error, "REFRESH_TOKEN_MISMATCH");
        assert!(response.message.contains("Refresh token mismatch"));
    }

    #[test]
    fn test_auth_error_conversion() {
        let response: ErrorResponse = AuthError::InvalidCredentials.into();

        assert_eq!(response.error, "INVALID_CREDENTIALS");
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::InvalidLifetime {
            field: "access_token_minutes".to_string(),
        };
        assert!(err.to_string().contains("access_token_minutes"));
    }
}
