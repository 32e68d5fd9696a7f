use sea_orm::DatabaseConnection;
use tracing::info;

use super::providers::{default_registry, redact_url};
use crate::config::DatabaseConfig;

/// Opens the pool for the configured backend and makes sure the `todos`
/// table exists.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let url = cfg.connection_url();
    let provider = default_registry()?.provider_for_url(&url)?;
    info!(
        provider = provider.id().as_str(),
        url = %redact_url(&url),
        "connecting to database"
    );

    let db = provider.connect(&url, cfg).await?;
    provider.post_connect(&db, cfg).await?;
    sync_schema(&db).await?;
    Ok(db)
}

pub async fn sync_schema(db: &DatabaseConnection) -> anyhow::Result<()> {
    info!("syncing database schema from entities");
    db.get_schema_registry("todo_server::db::entities::*")
        .sync(db)
        .await?;
    Ok(())
}
