//! Common type definitions shared across server modules

mod response;

pub use response::ErrorResponse;
