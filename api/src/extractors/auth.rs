//! Bearer-token extraction and verification for protected endpoints.

use std::future::{ready, Ready};
use std::sync::Arc;

use actix_web::dev::Payload;
use actix_web::error::{ErrorForbidden, ErrorInternalServerError, ErrorUnauthorized};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, Error, FromRequest, HttpRequest};

use ca_core::domain::entities::token::Claims;
use ca_core::services::token::TokenService;

/// Authenticated caller context extracted from a verified bearer token
///
/// Uses full verification (signature, expiry, not-before); expired tokens
/// are only acceptable on the refresh endpoint, which does not use this
/// extractor.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Verified claims of the caller
    pub claims: Claims,
}

impl AuthenticatedUser {
    /// Checks whether the caller carries the given role
    pub fn has_role(&self, role: &str) -> bool {
        self.claims.roles.iter().any(|r| r == role)
    }

    /// Fails with 403 unless the caller carries the given role
    pub fn require_role(&self, role: &str) -> Result<(), Error> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(ErrorForbidden("Insufficient permissions"))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

fn extract(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let token = bearer_token(req)
        .ok_or_else(|| ErrorUnauthorized("Missing or invalid Authorization header"))?;

    let token_service = req
        .app_data::<web::Data<Arc<TokenService>>>()
        .ok_or_else(|| ErrorInternalServerError("Token service not configured"))?;

    let claims = token_service
        .verify_access_token(&token)
        .map_err(|_| ErrorUnauthorized("Invalid or expired token"))?;

    Ok(AuthenticatedUser { claims })
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    header
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}
