mod config;
mod routes;

use std::sync::Arc;

use anyhow::Context;
use engine_logging::engine_info;
use probe_engine::{AnalysisEngine, HttpPageLoader};
use tokio::net::TcpListener;

use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_environment()?;
    engine_logging::initialize(
        config.log_destination(),
        config.level_filter(),
        &config.log_file,
    );

    let loader = Arc::new(HttpPageLoader::new(config.loader_settings()));
    let engine = AnalysisEngine::new(loader, config.engine_config());
    let app = routes::router(engine);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    engine_info!("Server is running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    engine_info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        engine_info!("Shutdown requested");
    }
}
