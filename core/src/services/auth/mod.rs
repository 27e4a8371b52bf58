//! Authentication flow: registration, login, refresh, revocation and
//! role assignment.

pub mod password;
mod service;

pub use service::AuthService;

#[cfg(test)]
mod tests;
