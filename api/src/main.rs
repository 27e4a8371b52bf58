use std::io;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use dotenvy::dotenv;
use log::{error, info};

use ca_api::config::ApiConfig;
use ca_api::middleware::cors::create_cors;
use ca_api::routes;
use ca_api::routes::auth::AppState;
use ca_core::services::auth::AuthService;
use ca_core::services::token::TokenService;
use ca_infra::database::{create_pool, mysql::MySqlUserRepository};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting catalog API server");

    // Load configuration; configuration errors are fatal before bind
    let config = ApiConfig::from_env().unwrap_or_else(|e| {
        error!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    let token_service = TokenService::new(config.jwt.clone().into()).unwrap_or_else(|e| {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    });
    let token_service = Arc::new(token_service);

    let pool = create_pool(&config.database_url)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let user_repository = Arc::new(MySqlUserRepository::new(pool));
    let auth_service = Arc::new(AuthService::new(user_repository, token_service.clone()));

    let bind_address = config.bind_address();
    info!("Server will bind to: {}", bind_address);

    HttpServer::new(move || {
        let state = AppState::new(auth_service.clone());

        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(state))
            .app_data(web::Data::new(token_service.clone()))
            // Health check endpoint
            .route("/health", web::get().to(health_check))
            // API v1 routes
            .service(
                web::scope("/api/v1").service(
                    web::scope("/auth")
                        .route(
                            "/register",
                            web::post().to(routes::auth::register::register::<MySqlUserRepository>),
                        )
                        .route(
                            "/login",
                            web::post().to(routes::auth::login::login::<MySqlUserRepository>),
                        )
                        .route(
                            "/refresh",
                            web::post().to(routes::auth::refresh::refresh::<MySqlUserRepository>),
                        )
                        .route(
                            "/revoke/{username}",
                            web::post().to(routes::auth::revoke::revoke::<MySqlUserRepository>),
                        )
                        .route(
                            "/roles/assign",
                            web::post()
                                .to(routes::auth::assign_role::assign_role::<MySqlUserRepository>),
                        ),
                ),
            )
            // Default 404 handler
            .default_service(web::route().to(|| async {
                HttpResponse::NotFound().json(serde_json::json!({
                    "error": "NOT_FOUND",
                    "message": "The requested resource was not found"
                }))
            }))
    })
    .bind(&bind_address)?
    .run()
    .await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "catalog-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
