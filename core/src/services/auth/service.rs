//! Main authentication service implementation.

use std::sync::Arc;

use constant_time_eq::constant_time_eq;
use tracing::{info, warn};

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainResult, TokenError};
use crate::repositories::UserRepository;
use crate::services::token::TokenService;

/// Authentication service managing the credential and token lifecycle
///
/// Owns the login / refresh / revoke state machine; token production is
/// delegated to `TokenService`, persisted session state to the repository.
pub struct AuthService<U: UserRepository> {
    /// User repository for persistence operations
    user_repository: Arc<U>,
    /// Token service for issuance and verification
    token_service: Arc<TokenService>,
}

impl<U: UserRepository> AuthService<U> {
    /// Create a new authentication service
    pub fn new(user_repository: Arc<U>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_repository,
            token_service,
        }
    }

    /// Register a new user account
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError)` - Username already taken, or persistence failure
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<User> {
        if self.user_repository.exists_by_username(username).await? {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let password_hash = super::password::hash_password(password)?;
        let user = User::new(username.to_string(), email.to_string(), password_hash);
        let created = self.user_repository.create(user).await?;

        info!(username = %created.username, "user registered");
        Ok(created)
    }

    /// Authenticate a user and issue a token pair
    ///
    /// Unknown username and wrong password both fail with
    /// `InvalidCredentials`; a dummy hash verification runs on the
    /// unknown-user path so the two rejections cost the same.
    ///
    /// Persisting the new refresh token overwrites any prior value, which
    /// implicitly invalidates the previous refresh token.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<TokenPair> {
        let mut user = match self.user_repository.find_by_username(username).await? {
            Some(user) => user,
            None => {
                super::password::verify_dummy(password);
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !super::password::verify_password(password, &user.password_hash)? {
            warn!(username = %username, "failed login attempt");
            return Err(AuthError::InvalidCredentials.into());
        }

        let (access_token, expiration) = self.token_service.issue_access_token(&user)?;
        let refresh_token = self.token_service.generate_refresh_token();
        let refresh_expires_at = self.token_service.refresh_token_expiry();

        user.set_refresh_token(refresh_token.clone(), refresh_expires_at);
        user.record_login();
        self.user_repository.update(user).await?;

        info!(username = %username, "login succeeded");
        Ok(TokenPair::new(access_token, refresh_token, expiration))
    }

    /// Exchange an expired access token and a valid refresh token for a new pair
    ///
    /// Checks run in a fixed order: the access token's signature is verified
    /// before any state lookup, so a forged token is rejected without
    /// revealing whether the subject exists. The presented refresh token is
    /// then compared byte-for-byte against the persisted value, the persisted
    /// expiry is checked, and finally both tokens are reissued with the
    /// rotation performed as a compare-and-swap keyed on the previous value.
    /// A rotation race lost to a concurrent refresh surfaces as
    /// `RefreshTokenMismatch`.
    pub async fn refresh(&self, access_token: &str, refresh_token: &str) -> DomainResult<TokenPair> {
        let claims = self.token_service.verify_for_refresh(access_token)?;

        let user = self
            .user_repository
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::UnknownSubject)?;

        let stored = user
            .refresh_token
            .as_deref()
            .ok_or(TokenError::RefreshTokenMismatch)?;

        if !constant_time_eq(stored.as_bytes(), refresh_token.as_bytes()) {
            warn!(username = %claims.sub, "refresh token mismatch");
            return Err(TokenError::RefreshTokenMismatch.into());
        }

        if user.refresh_token_expired() {
            return Err(TokenError::RefreshTokenExpired.into());
        }

        let (new_access_token, expiration) = self.token_service.reissue_access_token(&claims)?;
        let new_refresh_token = self.token_service.generate_refresh_token();
        let refresh_expires_at = self.token_service.refresh_token_expiry();

        let rotated = self
            .user_repository
            .rotate_refresh_token(
                &claims.sub,
                refresh_token,
                &new_refresh_token,
                refresh_expires_at,
            )
            .await?;

        if !rotated {
            // Another refresh rotated the token between our read and the swap
            return Err(TokenError::RefreshTokenMismatch.into());
        }

        info!(username = %claims.sub, "tokens refreshed");
        Ok(TokenPair::new(new_access_token, new_refresh_token, expiration))
    }

    /// Revoke the user's refresh token
    ///
    /// Clears the persisted value, blocking future refresh attempts. Access
    /// tokens already issued remain valid until their natural expiry.
    pub async fn revoke(&self, username: &str) -> DomainResult<()> {
        let cleared = self.user_repository.clear_refresh_token(username).await?;

        if !cleared {
            return Err(AuthError::UserNotFound.into());
        }

        info!(username = %username, "refresh token revoked");
        Ok(())
    }

    /// Assign a role to an existing user
    pub async fn assign_role(&self, username: &str, role: &str) -> DomainResult<User> {
        let mut user = self
            .user_repository
            .find_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.has_role(role) {
            return Err(AuthError::RoleAlreadyAssigned.into());
        }

        user.add_role(role.to_string());
        let updated = self.user_repository.update(user).await?;

        info!(username = %username, role = %role, "role assigned");
        Ok(updated)
    }
}
