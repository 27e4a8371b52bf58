//! Database connectivity and repository implementations.

pub mod mysql;

use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

/// Creates a MySQL connection pool
pub async fn create_pool(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}
