//! Authentication route handlers
//!
//! This module contains all authentication-related endpoints:
//! - User registration
//! - Login (credential verification and token issuance)
//! - Token refresh (rotation)
//! - Revocation
//! - Role assignment

pub mod assign_role;
pub mod login;
pub mod refresh;
pub mod register;
pub mod revoke;

use std::sync::Arc;

use ca_core::repositories::UserRepository;
use ca_core::services::auth::AuthService;

/// Shared application state for the auth routes
pub struct AppState<U: UserRepository> {
    /// Authentication service
    pub auth_service: Arc<AuthService<U>>,
}

impl<U: UserRepository> AppState<U> {
    /// Creates a new application state
    pub fn new(auth_service: Arc<AuthService<U>>) -> Self {
        Self { auth_service }
    }
}
