//! Handler for POST /api/v1/auth/refresh

use actix_web::{web, HttpResponse};
use validator::Validate;

use ca_core::repositories::UserRepository;
use ca_shared::types::ErrorResponse;

use crate::dto::auth_dto::{RefreshResponse, TokenRefreshRequest};
use crate::handlers::error_handler::handle_domain_error;

use super::AppState;

/// Exchanges an expired access token and a valid refresh token for a new pair.
///
/// The access token may be expired; its signature must still verify. The
/// refresh token is single-use: a successful exchange rotates it.
///
/// # Request Body
///
/// ```json
/// {
///     "accessToken": "eyJ...",
///     "refreshToken": "base64-opaque-value"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "accessToken": "eyJ...",
///     "refreshToken": "new-base64-opaque-value"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: malformed input
/// - 401 Unauthorized: tampered access token, unknown subject,
///   refresh-token mismatch, or refresh-token expired
pub async fn refresh<U>(
    state: web::Data<AppState<U>>,
    request: web::Json<TokenRefreshRequest>,
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
        .refresh(&request.access_token, &request.refresh_token)
        .await
    {
        Ok(pair) => HttpResponse::Ok().json(RefreshResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }),
        Err(error) => handle_domain_error(error),
    }
}
