use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

use super::registry::{DbProvider, DbProviderId};
use crate::config::DatabaseConfig;

const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;

pub struct SqliteDbProvider;

#[async_trait]
impl DbProvider for SqliteDbProvider {
    fn id(&self) -> DbProviderId {
        DbProviderId::Sqlite
    }

    fn supports_url(&self, url: &str) -> bool {
        url.trim().to_ascii_lowercase().starts_with("sqlite:")
    }

    async fn connect(&self, url: &str, cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
        // every pooled connection to `sqlite::memory:` opens its own database
        let max_connections = if is_in_memory(url) {
            1
        } else {
            cfg.max_connections
        };

        let mut options = ConnectOptions::new(url.to_string());
        options
            .max_connections(max_connections)
            .min_connections(cfg.min_idle.min(max_connections))
            .connect_timeout(Duration::from_secs(5))
            .sqlx_logging(false);

        let db = Database::connect(options).await?;
        Ok(db)
    }

    async fn post_connect(&self, db: &DatabaseConnection, _cfg: &DatabaseConfig) -> Result<()> {
        db.execute_unprepared(&format!("PRAGMA busy_timeout = {SQLITE_BUSY_TIMEOUT_MS}"))
            .await?;
        Ok(())
    }
}

fn is_in_memory(url: &str) -> bool {
    url.to_ascii_lowercase().contains(":memory:")
}

#[cfg(test)]
mod tests {
    use super::is_in_memory;

    #[test]
    fn detects_in_memory_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(!is_in_memory("sqlite://./todos.db?mode=rwc"));
    }
}
