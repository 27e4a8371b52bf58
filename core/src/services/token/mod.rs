//! Token issuance and verification.
//!
//! Layered as: `TokenSigner` (cryptographic primitive, HS256 only) under
//! `ClaimsBuilder` (claim assembly) under `TokenService` (access-token
//! issuance and opaque refresh-token generation).

mod claims;
mod config;
mod service;
mod signer;

pub use claims::ClaimsBuilder;
pub use config::TokenServiceConfig;
pub use service::{TokenService, REFRESH_TOKEN_BYTES};
pub use signer::TokenSigner;
