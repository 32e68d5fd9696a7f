use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;

use crate::{
    config::{AppConfig, DatabaseConfig},
    db::connection,
    routes::app,
    state::AppState,
};

pub const MEMORY_DB_URL: &str = "sqlite::memory:";

/// A fresh, schema-synced SQLite database that lives as long as the handle.
pub async fn memory_db() -> DatabaseConnection {
    connection::connect(&DatabaseConfig::with_url(MEMORY_DB_URL))
        .await
        .expect("open in-memory sqlite database")
}

pub fn test_state(db: DatabaseConnection) -> Arc<AppState> {
    let config = AppConfig {
        database: DatabaseConfig::with_url(MEMORY_DB_URL),
        ..AppConfig::default()
    };
    AppState::new(config, db)
}

pub fn test_router(db: DatabaseConnection) -> Router {
    app(test_state(db))
}
