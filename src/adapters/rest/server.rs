//! HTTP server assembly
//!
//! Builds the axum router over the shared gateway state and runs it
//! with graceful shutdown on Ctrl+C.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::adapters::indexnow::IndexNowSubmitter;
use crate::application::gateway::MarketGateway;

use super::routes;

pub struct AppState {
    pub gateway: MarketGateway,
    pub submitter: Option<IndexNowSubmitter>,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/health", get(routes::health))
        .route("/api/market/trending", get(routes::trending))
        .route("/api/market/global", get(routes::global))
        .route("/api/market/coins", get(routes::coin_markets))
        .route("/api/market/coins/{id}", get(routes::coin_detail))
        .route("/api/orderbook/{symbol}", get(routes::order_book))
        .route("/api/dex/{chain}/{pair}", get(routes::dex_pair))
        .route("/api/coingecko/{*subpath}", get(routes::gecko_proxy))
        .route("/api/indexnow", post(routes::submit_urls));

    // Ownership-proof file at the exact path the indexing service
    // expects, e.g. /abc123.txt
    if let Some(key) = state.submitter.as_ref().map(|s| s.key().to_string()) {
        router = router.route(&format!("/{key}.txt"), get(routes::key_file));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("gateway listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    tracing::info!("shutdown signal received");
}
