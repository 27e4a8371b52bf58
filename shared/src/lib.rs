//! Shared utilities and common types for the catalog backend
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error response structures

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::JwtConfig;
pub use types::ErrorResponse;
