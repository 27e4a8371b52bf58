//! Handler for POST /api/v1/auth/revoke/{username}

use actix_web::{web, HttpResponse};

use ca_core::repositories::UserRepository;

use crate::extractors::AuthenticatedUser;
use crate::handlers::error_handler::handle_domain_error;

use super::AppState;

/// Revokes the named user's refresh token.
///
/// Clears the persisted refresh token, blocking future refresh attempts.
/// Access tokens already issued remain valid until their natural expiry.
/// Requires an admin bearer token.
///
/// # Response
///
/// - 204 No Content: token revoked
/// - 400 Bad Request: unknown user
/// - 401 Unauthorized / 403 Forbidden: missing or non-admin credentials
pub async fn revoke<U>(
    state: web::Data<AppState<U>>,
    caller: AuthenticatedUser,
    username: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error>
where
    U: UserRepository + 'static,
{
    caller.require_role("admin")?;

    match state.auth_service.revoke(&username).await {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(error) => Ok(handle_domain_error(error)),
    }
}
