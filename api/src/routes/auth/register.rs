//! Handler for POST /api/v1/auth/register

use actix_web::{web, HttpResponse};
use validator::Validate;

use ca_core::repositories::UserRepository;
use ca_shared::types::ErrorResponse;

use crate::dto::auth_dto::{RegisterRequest, RegisterResponse};
use crate::handlers::error_handler::handle_domain_error;

use super::AppState;

/// Registers a new user account.
///
/// # Response
///
/// - 201 Created: account created
/// - 400 Bad Request: invalid payload
/// - 409 Conflict: username already taken
pub async fn register<U>(
    state: web::Data<AppState<U>>,
    request: web::Json<RegisterRequest>,
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
        .register(&request.username, &request.email, &request.password)
        .await
    {
        Ok(user) => HttpResponse::Created().json(RegisterResponse {
            username: user.username,
            email: user.email,
        }),
        Err(error) => handle_domain_error(error),
    }
}
