//! MySQL implementation of the UserRepository trait.
//!
//! Persists users with their embedded refresh-token session state. The
//! refresh-token rotation is expressed as a conditional UPDATE keyed on the
//! previous token value, so two concurrent rotations cannot both succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use ca_core::domain::entities::user::User;
use ca_core::errors::DomainError;
use ca_core::repositories::UserRepository;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| persistence(format!("Failed to get id: {}", e)))?;

        let roles_json: String = row
            .try_get("roles")
            .map_err(|e| persistence(format!("Failed to get roles: {}", e)))?;
        let roles: Vec<String> = serde_json::from_str(&roles_json)
            .map_err(|e| persistence(format!("Invalid roles column: {}", e)))?;

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| persistence(format!("Invalid user UUID: {}", e)))?,
            username: row
                .try_get("username")
                .map_err(|e| persistence(format!("Failed to get username: {}", e)))?,
            email: row
                .try_get("email")
                .map_err(|e| persistence(format!("Failed to get email: {}", e)))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| persistence(format!("Failed to get password_hash: {}", e)))?,
            roles,
            refresh_token: row
                .try_get("refresh_token")
                .map_err(|e| persistence(format!("Failed to get refresh_token: {}", e)))?,
            refresh_token_expires_at: row
                .try_get::<Option<DateTime<Utc>>, _>("refresh_token_expires_at")
                .map_err(|e| {
                    persistence(format!("Failed to get refresh_token_expires_at: {}", e))
                })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| persistence(format!("Failed to get created_at: {}", e)))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| persistence(format!("Failed to get updated_at: {}", e)))?,
            last_login_at: row
                .try_get::<Option<DateTime<Utc>>, _>("last_login_at")
                .map_err(|e| persistence(format!("Failed to get last_login_at: {}", e)))?,
        })
    }
}

fn persistence(message: String) -> DomainError {
    DomainError::Persistence { message }
}

const SELECT_COLUMNS: &str = "id, username, email, password_hash, roles, refresh_token, \
     refresh_token_expires_at, created_at, updated_at, last_login_at";

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE username = ?", SELECT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| persistence(format!("Failed to query user: {}", e)))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE id = ?", SELECT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| persistence(format!("Failed to query user: {}", e)))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?) as present")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| persistence(format!("Failed to check user existence: {}", e)))?;

        let present: i8 = row
            .try_get("present")
            .map_err(|e| persistence(format!("Failed to get existence result: {}", e)))?;

        Ok(present == 1)
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let roles_json = serde_json::to_string(&user.roles)
            .map_err(|e| persistence(format!("Failed to serialize roles: {}", e)))?;

        let query = r#"
            INSERT INTO users (
                id, username, email, password_hash, roles, refresh_token,
                refresh_token_expires_at, created_at, updated_at, last_login_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&roles_json)
            .bind(&user.refresh_token)
            .bind(user.refresh_token_expires_at)
            .bind(user.created_at)
            .bind(user.updated_at)
            .bind(user.last_login_at)
            .execute(&self.pool)
            .await
            .map_err(|e| persistence(format!("Failed to create user: {}", e)))?;

        tracing::debug!(username = %user.username, "user row inserted");
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let roles_json = serde_json::to_string(&user.roles)
            .map_err(|e| persistence(format!("Failed to serialize roles: {}", e)))?;

        let query = r#"
            UPDATE users SET
                email = ?, password_hash = ?, roles = ?, refresh_token = ?,
                refresh_token_expires_at = ?, updated_at = ?, last_login_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&roles_json)
            .bind(&user.refresh_token)
            .bind(user.refresh_token_expires_at)
            .bind(user.updated_at)
            .bind(user.last_login_at)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| persistence(format!("Failed to update user: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "User".to_string(),
            });
        }

        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| persistence(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn rotate_refresh_token(
        &self,
        username: &str,
        expected: &str,
        new_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        // Compare-and-swap: the row is updated only if the stored token
        // still equals the presented one
        let query = r#"
            UPDATE users SET
                refresh_token = ?, refresh_token_expires_at = ?, updated_at = ?
            WHERE username = ? AND refresh_token = ?
        "#;

        let result = sqlx::query(query)
            .bind(new_token)
            .bind(expires_at)
            .bind(Utc::now())
            .bind(username)
            .bind(expected)
            .execute(&self.pool)
            .await
            .map_err(|e| persistence(format!("Failed to rotate refresh token: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }

    async fn clear_refresh_token(&self, username: &str) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE users SET
                refresh_token = NULL, refresh_token_expires_at = NULL, updated_at = ?
            WHERE username = ?
        "#;

        let result = sqlx::query(query)
            .bind(Utc::now())
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(|e| persistence(format!("Failed to clear refresh token: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
