use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use dlmm_quote_engine::api::{build_router, AppState};
use dlmm_quote_engine::config::{self, APP_CONFIG, REDIS_CONFIG};
use dlmm_quote_engine::store::{RedisStateStore, StateStore};

const TOKEN_GRAPH_VERSION: &str = "v1";

#[tokio::main]
async fn main() -> Result<()> {
    config::init();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!(
        max_hops = APP_CONFIG.max_hops,
        debug = APP_CONFIG.debug,
        "starting dlmm quote engine"
    );

    let store: Arc<dyn StateStore> =
        Arc::new(RedisStateStore::connect(&REDIS_CONFIG.connection_url()).await?);

    let state = Arc::new(AppState {
        store,
        token_graph_version: TOKEN_GRAPH_VERSION.to_string(),
    });

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
    info!("listening on 0.0.0.0:8080");
    axum::serve(listener, app).await?;

    Ok(())
}
