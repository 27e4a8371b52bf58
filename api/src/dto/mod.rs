//! Data-transfer objects for the API layer.

pub mod auth_dto;

pub use ca_shared::types::ErrorResponse;
