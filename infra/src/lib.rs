//! Infrastructure layer for the catalog backend.
//!
//! Concrete implementations of the core repository interfaces.

pub mod database;

pub use database::mysql::MySqlUserRepository;
