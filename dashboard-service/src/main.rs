use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use dashboard_service::{
    config::AppConfig,
    observability,
    sources::OpenAqSource,
    store::MeasurementStore,
    web::{self, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        observability::init_metrics(&metrics_cfg.bind_addr);
    }

    let store = MeasurementStore::connect(&cfg.database.path, cfg.database.max_connections).await?;
    store.ensure_schema().await?;

    let source = OpenAqSource::new(&cfg.openaq.base_url)?;

    let state = Arc::new(AppState {
        store,
        source: Arc::new(source),
        parameter: cfg.openaq.parameter.clone(),
    });
    let app = web::router(state);

    let addr: SocketAddr = cfg
        .server
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.bind_addr: {e}"))?;

    tracing::info!(%addr, parameter = %cfg.openaq.parameter, "dashboard server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
