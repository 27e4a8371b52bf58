//! Maps domain errors to HTTP responses.
//!
//! Credential and refresh failures all map to 401 with only the coarse
//! error category; persistence and internal failures map to 500 and never
//! leak details to the client.

use actix_web::HttpResponse;
use log::error;

use ca_core::errors::{AuthError, DomainError, TokenError};
use ca_shared::types::ErrorResponse;

/// Converts a domain error into an HTTP response
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match &error {
        DomainError::Auth(auth_error) => match auth_error {
            AuthError::InvalidCredentials | AuthError::UnknownSubject => {
                HttpResponse::Unauthorized().json(response_for(&error))
            }
            AuthError::UserAlreadyExists => HttpResponse::Conflict().json(response_for(&error)),
            AuthError::UserNotFound | AuthError::RoleAlreadyAssigned => {
                HttpResponse::BadRequest().json(response_for(&error))
            }
        },
        DomainError::Token(token_error) => match token_error {
            TokenError::TokenGenerationFailed => internal_error(&error),
            _ => HttpResponse::Unauthorized().json(response_for(&error)),
        },
        DomainError::Validation { .. } => HttpResponse::BadRequest().json(response_for(&error)),
        DomainError::NotFound { .. } => HttpResponse::NotFound().json(response_for(&error)),
        DomainError::Persistence { .. }
        | DomainError::Internal { .. }
        | DomainError::Config(_) => internal_error(&error),
    }
}

fn internal_error(error: &DomainError) -> HttpResponse {
    error!("API error: {:?}", error);
    HttpResponse::InternalServerError().json(ErrorResponse::new(
        "INTERNAL_ERROR",
        "An internal error occurred",
    ))
}

fn response_for(error: &DomainError) -> ErrorResponse {
    ErrorResponse::new(error_code(error), error.to_string())
}

fn error_code(error: &DomainError) -> &'static str {
    match error {
        DomainError::Auth(auth_error) => match auth_error {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::UnknownSubject => "UNKNOWN_SUBJECT",
            AuthError::UserAlreadyExists => "USER_ALREADY_EXISTS",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::RoleAlreadyAssigned => "ROLE_ALREADY_ASSIGNED",
        },
        DomainError::Token(token_error) => match token_error {
            TokenError::TamperedToken => "TAMPERED_TOKEN",
            TokenError::MalformedToken => "MALFORMED_TOKEN",
            TokenError::TokenExpired => "TOKEN_EXPIRED",
            TokenError::TokenNotYetValid => "TOKEN_NOT_YET_VALID",
            TokenError::RefreshTokenMismatch => "REFRESH_TOKEN_MISMATCH",
            TokenError::RefreshTokenExpired => "REFRESH_TOKEN_EXPIRED",
            TokenError::TokenGenerationFailed => "TOKEN_GENERATION_FAILED",
        },
        DomainError::Validation { .. } => "VALIDATION_ERROR",
        DomainError::NotFound { .. } => "NOT_FOUND",
        DomainError::Persistence { .. } => "PERSISTENCE_FAILURE",
        DomainError::Internal { .. } => "INTERNAL_ERROR",
        DomainError::Config(_) => "CONFIGURATION_ERROR",
    }
}
