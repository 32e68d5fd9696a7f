use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;

use todo_server::{
    config::{AppConfig, defaults::DEFAULT_RUST_LOG},
    db::connection,
    logging::init_tracing,
    routes::app,
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            // still report config errors through the subscriber
            init_tracing(DEFAULT_RUST_LOG);
            return Err(err.context("failed to load config"));
        }
    };
    init_tracing(&cfg.logging.rust_log);

    let db = connection::connect(&cfg.database).await?;
    let addr: SocketAddr = format!("{}:{}", cfg.general.host, cfg.general.port)
        .parse()
        .context("invalid host/port")?;
    let state = AppState::new(cfg, db);

    let app = app(Arc::clone(&state));

    tracing::info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
