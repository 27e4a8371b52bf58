//! Repository interfaces for the domain layer.

pub mod user_repository;

pub use user_repository::UserRepository;
