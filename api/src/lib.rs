//! HTTP API layer for the catalog backend.
//!
//! Transport-level orchestration only: request parsing, response
//! formatting, and routing into the core authentication services.

pub mod config;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
