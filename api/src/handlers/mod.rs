//! Request handlers and error mapping.

pub mod error_handler;
