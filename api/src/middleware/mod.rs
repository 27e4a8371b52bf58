//! Transport middleware.

pub mod cors;
