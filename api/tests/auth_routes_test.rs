//! End-to-end tests for the authentication endpoints.
//!
//! These run the actix service against an in-memory repository, exercising
//! the register → login → refresh → revoke lifecycle over the wire.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};

use ca_api::routes;
use ca_api::routes::auth::AppState;
use ca_core::domain::entities::user::User;
use ca_core::errors::DomainError;
use ca_core::repositories::UserRepository;
use ca_core::services::auth::password::hash_password;
use ca_core::services::auth::AuthService;
use ca_core::services::token::{TokenService, TokenServiceConfig};

/// In-memory repository standing in for MySQL
struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.username == username))
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(DomainError::Validation {
                message: "Username already registered".to_string(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(DomainError::NotFound {
                resource: "User".to_string(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        Ok(users.remove(&id).is_some())
    }

    async fn rotate_refresh_token(
        &self,
        username: &str,
        expected: &str,
        new_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        let user = match users.values_mut().find(|u| u.username == username) {
            Some(user) => user,
            None => return Ok(false),
        };
        if user.refresh_token.as_deref() != Some(expected) {
            return Ok(false);
        }
        user.set_refresh_token(new_token.to_string(), expires_at);
        Ok(true)
    }

    async fn clear_refresh_token(&self, username: &str) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        match users.values_mut().find(|u| u.username == username) {
            Some(user) => {
                user.clear_refresh_token();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn token_config() -> TokenServiceConfig {
    TokenServiceConfig {
        secret: "integration-test-secret-that-is-long-enough".to_string(),
        access_token_minutes: 15,
        refresh_token_minutes: 1440,
        issuer: "catalog-api".to_string(),
        audience: "catalog-clients".to_string(),
    }
}

fn services(
    repo: Arc<InMemoryUserRepository>,
) -> (Arc<AuthService<InMemoryUserRepository>>, Arc<TokenService>) {
    let token_service = Arc::new(TokenService::new(token_config()).unwrap());
    let auth_service = Arc::new(AuthService::new(repo, token_service.clone()));
    (auth_service, token_service)
}

/// Builds the full route tree against the given repository
macro_rules! init_app {
    ($repo:expr) => {{
        let (auth_service, token_service) = services($repo);
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(auth_service)))
                .app_data(web::Data::new(token_service))
                .service(
                    web::scope("/api/v1").service(
                        web::scope("/auth")
                            .route(
                                "/register",
                                web::post()
                                    .to(routes::auth::register::register::<InMemoryUserRepository>),
                            )
                            .route(
                                "/login",
                                web::post()
                                    .to(routes::auth::login::login::<InMemoryUserRepository>),
                            )
                            .route(
                                "/refresh",
                                web::post()
                                    .to(routes::auth::refresh::refresh::<InMemoryUserRepository>),
                            )
                            .route(
                                "/revoke/{username}",
                                web::post()
                                    .to(routes::auth::revoke::revoke::<InMemoryUserRepository>),
                            )
                            .route(
                                "/roles/assign",
                                web::post().to(
                                    routes::auth::assign_role::assign_role::<InMemoryUserRepository>,
                                ),
                            ),
                    ),
                ),
        )
        .await
    }};
}

async fn seed_user(repo: &InMemoryUserRepository, username: &str, password: &str) {
    let hash = hash_password(password).unwrap();
    let user = User::new(
        username.to_string(),
        format!("{}@example.com", username),
        hash,
    );
    repo.create(user).await.unwrap();
}

async fn seed_admin(repo: &InMemoryUserRepository, username: &str, password: &str) {
    let hash = hash_password(password).unwrap();
    let mut user = User::new(
        username.to_string(),
        format!("{}@example.com", username),
        hash,
    );
    user.add_role("admin".to_string());
    repo.create(user).await.unwrap();
}

#[actix_rt::test]
async fn test_register_creates_account() {
    let repo = Arc::new(InMemoryUserRepository::new());
    let app = init_app!(repo.clone());

    let request = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(serde_json::json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "Str0ng!Passw0rd"
        }))
        .to_request();

    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
}

#[actix_rt::test]
async fn test_register_duplicate_username_conflicts() {
    let repo = Arc::new(InMemoryUserRepository::new());
    seed_user(&repo, "alice", "Str0ng!Passw0rd").await;
    let app = init_app!(repo.clone());

    let request = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(serde_json::json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "Str0ng!Passw0rd"
        }))
        .to_request();

    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[actix_rt::test]
async fn test_register_rejects_invalid_payload() {
    let repo = Arc::new(InMemoryUserRepository::new());
    let app = init_app!(repo.clone());

    let request = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(serde_json::json!({
            "username": "al",
            "email": "not-an-email",
            "password": "short"
        }))
        .to_request();

    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_rt::test]
async fn test_login_returns_token_pair() {
    let repo = Arc::new(InMemoryUserRepository::new());
    seed_user(&repo, "alice", "Str0ng!Passw0rd").await;
    let app = init_app!(repo.clone());

    let request = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({
            "username": "alice",
            "password": "Str0ng!Passw0rd"
        }))
        .to_request();

    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(response).await;
    assert!(!body["accessToken"].as_str().unwrap().is_empty());
    assert_eq!(body["refreshToken"].as_str().unwrap().len(), 172);
    assert!(body["expiration"].as_str().is_some());
}

#[actix_rt::test]
async fn test_login_wrong_password_unauthorized() {
    let repo = Arc::new(InMemoryUserRepository::new());
    seed_user(&repo, "alice", "Str0ng!Passw0rd").await;
    let app = init_app!(repo.clone());

    let request = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({
            "username": "alice",
            "password": "wrong-password"
        }))
        .to_request();

    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "INVALID_CREDENTIALS");
}

#[actix_rt::test]
async fn test_login_unknown_user_same_error_as_wrong_password() {
    let repo = Arc::new(InMemoryUserRepository::new());
    let app = init_app!(repo.clone());

    let request = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({
            "username": "nobody",
            "password": "whatever-pass"
        }))
        .to_request();

    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "INVALID_CREDENTIALS");
}

#[actix_rt::test]
async fn test_refresh_rotates_token_pair() {
    let repo = Arc::new(InMemoryUserRepository::new());
    seed_user(&repo, "alice", "Str0ng!Passw0rd").await;
    let app = init_app!(repo.clone());

    let login = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({
            "username": "alice",
            "password": "Str0ng!Passw0rd"
        }))
        .to_request();
    let pair: serde_json::Value =
        test::read_body_json(test::call_service(&app, login).await).await;

    let refresh = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(serde_json::json!({
            "accessToken": pair["accessToken"],
            "refreshToken": pair["refreshToken"]
        }))
        .to_request();

    let response = test::call_service(&app, refresh).await;
    assert_eq!(response.status(), StatusCode::OK);

    let rotated: serde_json::Value = test::read_body_json(response).await;
    assert_ne!(rotated["refreshToken"], pair["refreshToken"]);
    assert_eq!(rotated["refreshToken"].as_str().unwrap().len(), 172);

    // The consumed refresh token is dead
    let replay = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(serde_json::json!({
            "accessToken": pair["accessToken"],
            "refreshToken": pair["refreshToken"]
        }))
        .to_request();

    let response = test::call_service(&app, replay).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "REFRESH_TOKEN_MISMATCH");
}

#[actix_rt::test]
async fn test_refresh_rejects_tampered_access_token() {
    let repo = Arc::new(InMemoryUserRepository::new());
    seed_user(&repo, "alice", "Str0ng!Passw0rd").await;
    let app = init_app!(repo.clone());

    let login = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({
            "username": "alice",
            "password": "Str0ng!Passw0rd"
        }))
        .to_request();
    let pair: serde_json::Value =
        test::read_body_json(test::call_service(&app, login).await).await;

    // Corrupt the signature segment
    let mut tampered = pair["accessToken"].as_str().unwrap().to_string();
    tampered.pop();
    tampered.push('x');

    let refresh = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(serde_json::json!({
            "accessToken": tampered,
            "refreshToken": pair["refreshToken"]
        }))
        .to_request();

    let response = test::call_service(&app, refresh).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_revoke_requires_admin_role() {
    let repo = Arc::new(InMemoryUserRepository::new());
    seed_user(&repo, "alice", "Str0ng!Passw0rd").await;
    let app = init_app!(repo.clone());

    let login = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({
            "username": "alice",
            "password": "Str0ng!Passw0rd"
        }))
        .to_request();
    let pair: serde_json::Value =
        test::read_body_json(test::call_service(&app, login).await).await;
    let bearer = format!("Bearer {}", pair["accessToken"].as_str().unwrap());

    // Authenticated but not admin
    let request = test::TestRequest::post()
        .uri("/api/v1/auth/revoke/alice")
        .insert_header(("Authorization", bearer))
        .to_request();

    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // No credentials at all
    let request = test::TestRequest::post()
        .uri("/api/v1/auth/revoke/alice")
        .to_request();

    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_revoke_blocks_subsequent_refresh() {
    let repo = Arc::new(InMemoryUserRepository::new());
    seed_admin(&repo, "root", "Adm1n!Passw0rd").await;
    seed_user(&repo, "alice", "Str0ng!Passw0rd").await;
    let app = init_app!(repo.clone());

    let login = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({
            "username": "alice",
            "password": "Str0ng!Passw0rd"
        }))
        .to_request();
    let pair: serde_json::Value =
        test::read_body_json(test::call_service(&app, login).await).await;

    let admin_login = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({
            "username": "root",
            "password": "Adm1n!Passw0rd"
        }))
        .to_request();
    let admin_pair: serde_json::Value =
        test::read_body_json(test::call_service(&app, admin_login).await).await;
    let bearer = format!("Bearer {}", admin_pair["accessToken"].as_str().unwrap());

    let revoke = test::TestRequest::post()
        .uri("/api/v1/auth/revoke/alice")
        .insert_header(("Authorization", bearer.clone()))
        .to_request();

    let response = test::call_service(&app, revoke).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Alice's previously issued refresh token no longer works
    let refresh = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(serde_json::json!({
            "accessToken": pair["accessToken"],
            "refreshToken": pair["refreshToken"]
        }))
        .to_request();

    let response = test::call_service(&app, refresh).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Revoking an unknown user is a client error
    let revoke = test::TestRequest::post()
        .uri("/api/v1/auth/revoke/ghost")
        .insert_header(("Authorization", bearer))
        .to_request();

    let response = test::call_service(&app, revoke).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_assign_role_flow() {
    let repo = Arc::new(InMemoryUserRepository::new());
    seed_admin(&repo, "root", "Adm1n!Passw0rd").await;
    seed_user(&repo, "alice", "Str0ng!Passw0rd").await;
    let app = init_app!(repo.clone());

    let admin_login = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({
            "username": "root",
            "password": "Adm1n!Passw0rd"
        }))
        .to_request();
    let admin_pair: serde_json::Value =
        test::read_body_json(test::call_service(&app, admin_login).await).await;
    let bearer = format!("Bearer {}", admin_pair["accessToken"].as_str().unwrap());

    let assign = test::TestRequest::post()
        .uri("/api/v1/auth/roles/assign")
        .insert_header(("Authorization", bearer.clone()))
        .set_json(serde_json::json!({
            "username": "alice",
            "role": "editor"
        }))
        .to_request();

    let response = test::call_service(&app, assign).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["roles"], serde_json::json!(["editor"]));

    // Assigning the same role twice is rejected
    let assign = test::TestRequest::post()
        .uri("/api/v1/auth/roles/assign")
        .insert_header(("Authorization", bearer))
        .set_json(serde_json::json!({
            "username": "alice",
            "role": "editor"
        }))
        .to_request();

    let response = test::call_service(&app, assign).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
