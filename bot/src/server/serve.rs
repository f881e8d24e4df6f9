//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::options::ServerOptions;
use crate::errors::BridgeError;
use crate::server::handlers::{health_handler, webhook_handler};
use crate::server::state::ServerState;

/// Routes of the webhook listener
pub fn webhook_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/webhook", post(webhook_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind `app` on the configured address and serve it on a background task
pub async fn serve(
    name: &'static str,
    options: &ServerOptions,
    app: Router,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), BridgeError>>, BridgeError> {
    let addr = options.addr();
    info!("Starting {} server on {}", name, addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| BridgeError::ServerError(format!("{name}: bind {addr}: {e}")))?;

    let handle = tokio::spawn(async move {
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| BridgeError::ServerError(format!("{name}: {e}")));
        info!("{} server stopped", name);
        result
    });

    Ok(handle)
}
