//! Handler for POST /api/v1/auth/login

use actix_web::{web, HttpResponse};
use validator::Validate;

use ca_core::repositories::UserRepository;
use ca_shared::types::ErrorResponse;

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::handlers::error_handler::handle_domain_error;

use super::AppState;

/// Authenticates a user and returns an access/refresh token pair.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "accessToken": "eyJ...",
///     "refreshToken": "base64-opaque-value",
///     "expiration": "2026-01-01T00:15:00Z"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: missing username or password
/// - 401 Unauthorized: invalid credentials (unknown user and wrong
///   password are indistinguishable)
pub async fn login<U>(
    state: web::Data<AppState<U>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::new("VALIDATION_ERROR", errors.to_string()));
    }

    match state
        .auth_service
        .login(&request.username, &request.password)
        .await
    {
        Ok(pair) => HttpResponse::Ok().json(LoginResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expiration: pair.expiration,
        }),
        Err(error) => handle_domain_error(error),
    }
}
