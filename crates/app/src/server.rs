//! Local HTTP interface over the progress store.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use services::ProgressService;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::routes;

/// Application state shared across handlers.
pub struct AppState {
    pub progress: Arc<ProgressService>,
}

impl AppState {
    pub fn new(progress: Arc<ProgressService>) -> Self {
        Self { progress }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::star_routes())
        .merge(routes::stats_routes())
        .merge(routes::health_routes())
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
}

/// Serve until Ctrl-C.
pub async fn run(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
