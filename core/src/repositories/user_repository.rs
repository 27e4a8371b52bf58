//! User repository trait defining the interface for user data persistence.
//!
//! Besides user CRUD, this trait owns the persisted refresh-token session
//! state: one current token value and its absolute expiry per user. The
//! rotation operation is a compare-and-swap so two concurrent refresh
//! attempts against the same token cannot both succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// Implementations handle the actual database operations while maintaining
/// the abstraction boundary between domain and infrastructure layers.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their login name
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with the given username
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Check if a user exists with the given username
    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError>;

    /// Create a new user in the repository
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError)` - Creation failed (e.g. duplicate username)
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing user in the repository
    async fn update(&self, user: User) -> Result<User, DomainError>;

    /// Delete a user from the repository
    ///
    /// # Returns
    /// * `Ok(true)` - User was deleted
    /// * `Ok(false)` - User not found
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Atomically rotate the user's refresh token
    ///
    /// Replaces the stored token with `new_token` only if the stored value
    /// still equals `expected`. Of two concurrent rotations presenting the
    /// same token, exactly one observes the pre-rotation value and wins.
    ///
    /// # Returns
    /// * `Ok(true)` - Stored value matched `expected` and was replaced
    /// * `Ok(false)` - Stored value no longer matches (lost the race)
    async fn rotate_refresh_token(
        &self,
        username: &str,
        expected: &str,
        new_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Clear the user's refresh token, blocking future refresh attempts
    ///
    /// # Returns
    /// * `Ok(true)` - Token cleared
    /// * `Ok(false)` - User not found
    async fn clear_refresh_token(&self, username: &str) -> Result<bool, DomainError>;
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_user(username: &str) -> User {
        User::new(
            username.to_string(),
            format!("{}@example.com", username),
            "$2b$12$hash".to_string(),
        )
    }

    #[tokio::test]
    async fn test_mock_repository_create_and_find() {
        let repo = mock::MockUserRepository::new();
        let user = sample_user("alice");

        let created = repo.create(user.clone()).await.unwrap();
        assert_eq!(created.id, user.id);

        let found = repo.find_by_username("alice").await.unwrap();
        assert_eq!(found.unwrap().id, user.id);
    }

    #[tokio::test]
    async fn test_mock_repository_duplicate_username() {
        let repo = mock::MockUserRepository::new();

        repo.create(sample_user("alice")).await.unwrap();
        let result = repo.create(sample_user("alice")).await;

        assert!(matches!(
            result.unwrap_err(),
            DomainError::Validation { .. }
        ));
    }

    #[tokio::test]
    async fn test_store_and_clear_refresh_token() {
        let repo = mock::MockUserRepository::new();
        repo.create(sample_user("alice")).await.unwrap();

        let expiry = Utc::now() + Duration::minutes(1440);
        repo.store_refresh_token("alice", "token-1", expiry)
            .await
            .unwrap();

        let user = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(user.refresh_token.as_deref(), Some("token-1"));

        assert!(repo.clear_refresh_token("alice").await.unwrap());
        let user = repo.find_by_username("alice").await.unwrap().unwrap();
        assert!(user.refresh_token.is_none());
    }

    #[tokio::test]
    async fn test_clear_refresh_token_unknown_user() {
        let repo = mock::MockUserRepository::new();
        assert!(!repo.clear_refresh_token("ghost").await.unwrap());
    }

    #[tokio::test]
    async fn test_rotate_refresh_token_cas() {
        let repo = mock::MockUserRepository::new();
        repo.create(sample_user("alice")).await.unwrap();

        let expiry = Utc::now() + Duration::minutes(1440);
        repo.store_refresh_token("alice", "token-1", expiry)
            .await
            .unwrap();

        // Rotation with the current value succeeds
        assert!(repo
            .rotate_refresh_token("alice", "token-1", "token-2", expiry)
            .await
            .unwrap());

        // Rotation keyed on the old value fails after the overwrite
        assert!(!repo
            .rotate_refresh_token("alice", "token-1", "token-3", expiry)
            .await
            .unwrap());

        let user = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(user.refresh_token.as_deref(), Some("token-2"));
    }
}
