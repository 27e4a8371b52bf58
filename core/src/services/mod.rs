//! Business services for authentication and token lifecycle management.

pub mod auth;
pub mod token;

pub use auth::AuthService;
pub use token::{ClaimsBuilder, TokenService, TokenServiceConfig, TokenSigner};
