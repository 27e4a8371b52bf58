//! Handler for POST /api/v1/auth/roles/assign

use actix_web::{web, HttpResponse};
use validator::Validate;

use ca_core::repositories::UserRepository;
use ca_shared::types::ErrorResponse;

use crate::dto::auth_dto::AssignRoleRequest;
use crate::extractors::AuthenticatedUser;
use crate::handlers::error_handler::handle_domain_error;

use super::AppState;

/// Assigns a role to an existing user. Requires an admin bearer token.
///
/// Newly assigned roles take effect on the next token issuance; tokens
/// already in flight keep the role claims they were signed with.
///
/// # Response
///
/// - 200 OK: role assigned
/// - 400 Bad Request: unknown user or role already assigned
/// - 401 Unauthorized / 403 Forbidden: missing or non-admin credentials
pub async fn assign_role<U>(
    state: web::Data<AppState<U>>,
    caller: AuthenticatedUser,
    request: web::Json<AssignRoleRequest>,
) -> Result<HttpResponse, actix_web::Error>
where
    U: UserRepository + 'static,
{
    caller.require_role("admin")?;

    if let Err(errors) = request.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ErrorResponse::new("VALIDATION_ERROR", errors.to_string())));
    }

    match state
        .auth_service
        .assign_role(&request.username, &request.role)
        .await
    {
        Ok(user) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "username": user.username,
            "roles": user.roles,
        }))),
        Err(error) => Ok(handle_domain_error(error)),
    }
}
