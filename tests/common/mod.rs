#![allow(dead_code)]

use axum::Router;
use sales_tracker::backend::SqliteBackend;
use sales_tracker::config::{
    AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, PaginationConfig, ServerConfig,
};
use sales_tracker::startup::build_app;
use serde_json::{json, Value};
use std::sync::Arc;

pub const TEST_TOKEN: &str = "test-token";

/// Build the application against a fresh in-memory database
pub async fn setup_test_app(
    app_config: AppConfig,
) -> Result<(Router, Arc<SqliteBackend>), Box<dyn std::error::Error>> {
    let (router, backend) = build_app(app_config).await?;
    Ok((router, backend))
}

/// Bearer-protected configuration used by most tests
pub fn create_test_app_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        database: DatabaseConfig {
            db_type: "sqlite".to_string(),
            url: ":memory:".to_string(),
            max_connections: 1,
            connection_timeout: 30,
        },
        auth: AuthConfig {
            auth_type: "bearer".to_string(),
            token: Some(TEST_TOKEN.to_string()),
            basic: None,
        },
        pagination: PaginationConfig::default(),
        logging: LoggingConfig::default(),
    }
}

/// Same as `create_test_app_config` but without any credentials check
pub fn create_unauthenticated_app_config() -> AppConfig {
    let mut config = create_test_app_config();
    config.auth = AuthConfig {
        auth_type: "unauthenticated".to_string(),
        token: None,
        basic: None,
    };
    config
}

pub fn auth_header() -> String {
    format!("Bearer {}", TEST_TOKEN)
}

/// Insert a row into the users reference table and return its id
pub async fn seed_user(backend: &SqliteBackend, name: &str) -> i64 {
    sqlx::query("INSERT INTO users (name, mail, status) VALUES (?, ?, 'active')")
        .bind(name)
        .bind(format!("{}@example.com", name.to_lowercase()))
        .execute(backend.pool())
        .await
        .expect("seed user")
        .last_insert_rowid()
}

pub fn create_test_sale_json(seller_id: i64, amount: f64, date: &str) -> Value {
    json!({
        "sellerId": seller_id,
        "boardId": 1,
        "unityId": 1,
        "managerId": 1,
        "amount": amount,
        "location": "-23.5505,-46.6333",
        "date": date,
        "status": "closed"
    })
}
