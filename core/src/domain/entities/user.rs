//! User entity representing a registered account in the catalog backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity representing a registered account
///
/// The refresh-token session state is embedded in the user record: at most
/// one refresh token is valid per user at any time, and issuing a new one
/// invalidates the previous value by overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Unique login name
    pub username: String,

    /// Email address
    pub email: String,

    /// Bcrypt hash of the user's password
    pub password_hash: String,

    /// Role names assigned to the user
    pub roles: Vec<String>,

    /// Current refresh token, if one has been issued
    pub refresh_token: Option<String>,

    /// Absolute expiry of the current refresh token
    pub refresh_token_expires_at: Option<DateTime<Utc>>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,

    /// Timestamp of the user's last login
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new User instance
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            roles: Vec::new(),
            refresh_token: None,
            refresh_token_expires_at: None,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Stores a new refresh token, replacing any previous value
    pub fn set_refresh_token(&mut self, token: String, expires_at: DateTime<Utc>) {
        self.refresh_token = Some(token);
        self.refresh_token_expires_at = Some(expires_at);
        self.updated_at = Utc::now();
    }

    /// Clears the stored refresh token, blocking future refresh attempts
    pub fn clear_refresh_token(&mut self) {
        self.refresh_token = None;
        self.refresh_token_expires_at = None;
        self.updated_at = Utc::now();
    }

    /// Adds a role to the user
    pub fn add_role(&mut self, role: String) {
        if !self.has_role(&role) {
            self.roles.push(role);
            self.updated_at = Utc::now();
        }
    }

    /// Checks whether the user has the given role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Updates the last login timestamp
    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Checks whether the stored refresh token has passed its expiry
    pub fn refresh_token_expired(&self) -> bool {
        match self.refresh_token_expires_at {
            Some(expires_at) => Utc::now() >= expires_at,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_user() -> User {
        User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "$2b$12$hash".to_string(),
        )
    }

    #[test]
    fn test_new_user_has_no_session() {
        let user = sample_user();

        assert_eq!(user.username, "alice");
        assert!(user.roles.is_empty());
        assert!(user.refresh_token.is_none());
        assert!(user.refresh_token_expires_at.is_none());
        assert!(user.refresh_token_expired());
    }

    #[test]
    fn test_set_and_clear_refresh_token() {
        let mut user = sample_user();
        let expiry = Utc::now() + Duration::minutes(1440);

        user.set_refresh_token("opaque-token".to_string(), expiry);
        assert_eq!(user.refresh_token.as_deref(), Some("opaque-token"));
        assert!(!user.refresh_token_expired());

        user.clear_refresh_token();
        assert!(user.refresh_token.is_none());
        assert!(user.refresh_token_expires_at.is_none());
    }

    #[test]
    fn test_refresh_token_expiry_in_past() {
        let mut user = sample_user();
        user.set_refresh_token("stale".to_string(), Utc::now() - Duration::minutes(1));

        assert!(user.refresh_token_expired());
    }

    #[test]
    fn test_role_management() {
        let mut user = sample_user();

        user.add_role("admin".to_string());
        user.add_role("admin".to_string());

        assert_eq!(user.roles.len(), 1);
        assert!(user.has_role("admin"));
        assert!(!user.has_role("editor"));
    }

    #[test]
    fn test_record_login() {
        let mut user = sample_user();
        assert!(user.last_login_at.is_none());

        user.record_login();
        assert!(user.last_login_at.is_some());
    }
}
