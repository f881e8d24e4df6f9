//! Main application run loop

use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::app::options::{AppOptions, LifecycleOptions};
use crate::app::state::AppState;
use crate::dashboard::{dashboard_router, DashboardState};
use crate::errors::BridgeError;
use crate::http::TelegramClient;
use crate::server::{serve, webhook_router, ServerState};

/// Run the CI bridge until `shutdown_signal` resolves
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), BridgeError> {
    info!("Initializing CI bridge...");

    // Create shutdown channel
    let (shutdown_tx, _shutdown_rx): (broadcast::Sender<()>, _) = broadcast::channel(1);
    let mut shutdown_manager = ShutdownManager::new(shutdown_tx.clone(), options.lifecycle.clone());

    if let Err(e) = init(&options, &shutdown_tx, &mut shutdown_manager).await {
        error!("Failed to start CI bridge: {}", e);
        shutdown_manager.shutdown().await?;
        return Err(e);
    }

    shutdown_signal.await;
    info!("Shutdown signal received, shutting down...");

    drop(shutdown_tx);
    shutdown_manager.shutdown().await
}

// =============================== INITIALIZATION ================================== //

async fn init(
    options: &AppOptions,
    shutdown_tx: &broadcast::Sender<()>,
    shutdown_manager: &mut ShutdownManager,
) -> Result<(), BridgeError> {
    let app_state = AppState::init(options).await?;

    register_webhook(&app_state.telegram, &options.telegram.webhook_url).await;

    init_webhook_server(options, &app_state, shutdown_manager, shutdown_tx.subscribe()).await?;

    if options.enable_dashboard {
        init_dashboard_server(options, &app_state, shutdown_manager, shutdown_tx.subscribe())
            .await?;
    }

    Ok(())
}

/// Point Telegram at our public webhook URL.
///
/// Registration is idempotent on Telegram's side. A failure leaves the
/// listeners running; a previous registration may still be in effect.
async fn register_webhook(telegram: &TelegramClient, webhook_url: &str) {
    match telegram.set_webhook(webhook_url).await {
        Ok(()) => info!("Telegram webhook registered"),
        Err(e) => error!("Failed to register Telegram webhook: {}", e),
    }
}

async fn init_webhook_server(
    options: &AppOptions,
    app_state: &AppState,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), BridgeError> {
    info!("Initializing webhook server...");

    let server_state = ServerState::new(app_state.dispatcher.clone());
    let app = webhook_router(Arc::new(server_state));

    let handle = serve("webhook", &options.server, app, async move {
        let _ = shutdown_rx.recv().await;
    })
    .await?;

    shutdown_manager.with_webhook_server_handle(handle)
}

async fn init_dashboard_server(
    options: &AppOptions,
    app_state: &AppState,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), BridgeError> {
    info!("Initializing dashboard server...");

    let dashboard_state = DashboardState {
        build_server: app_state.jenkins.clone(),
        webhook_url: options.telegram.webhook_url.clone(),
        job: options.jenkins.job.clone(),
    };
    let app = dashboard_router(Arc::new(dashboard_state));

    let handle = serve("dashboard", &options.dashboard, app, async move {
        let _ = shutdown_rx.recv().await;
    })
    .await?;

    shutdown_manager.with_dashboard_server_handle(handle)
}

// ================================= SHUTDOWN ===================================== //

type ServerHandle = JoinHandle<Result<(), BridgeError>>;

struct ShutdownManager {
    shutdown_tx: broadcast::Sender<()>,
    lifecycle_options: LifecycleOptions,
    webhook_server_handle: Option<ServerHandle>,
    dashboard_server_handle: Option<ServerHandle>,
}

impl ShutdownManager {
    pub fn new(shutdown_tx: broadcast::Sender<()>, lifecycle_options: LifecycleOptions) -> Self {
        Self {
            shutdown_tx,
            lifecycle_options,
            webhook_server_handle: None,
            dashboard_server_handle: None,
        }
    }

    pub fn with_webhook_server_handle(&mut self, handle: ServerHandle) -> Result<(), BridgeError> {
        if self.webhook_server_handle.is_some() {
            return Err(BridgeError::ShutdownError("webhook_server_handle already set".to_string()));
        }
        self.webhook_server_handle = Some(handle);
        Ok(())
    }

    pub fn with_dashboard_server_handle(&mut self, handle: ServerHandle) -> Result<(), BridgeError> {
        if self.dashboard_server_handle.is_some() {
            return Err(BridgeError::ShutdownError(
                "dashboard_server_handle already set".to_string(),
            ));
        }
        self.dashboard_server_handle = Some(handle);
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<(), BridgeError> {
        let _ = self.shutdown_tx.send(());

        match tokio::time::timeout(
            self.lifecycle_options.max_shutdown_delay,
            self.shutdown_impl(),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                error!(
                    "Shutdown timed out after {:?}, forcing shutdown...",
                    self.lifecycle_options.max_shutdown_delay
                );
                std::process::exit(1);
            }
        }
    }

    async fn shutdown_impl(&mut self) -> Result<(), BridgeError> {
        info!("Shutting down CI bridge...");

        // Each listener is joined on its own so one failure does not strand the other
        let webhook = join_server(self.webhook_server_handle.take()).await;
        let dashboard = join_server(self.dashboard_server_handle.take()).await;

        info!("Shutdown complete");
        webhook.and(dashboard)
    }
}

async fn join_server(handle: Option<ServerHandle>) -> Result<(), BridgeError> {
    let Some(handle) = handle else {
        return Ok(());
    };
    handle
        .await
        .map_err(|e| BridgeError::ShutdownError(e.to_string()))?
}
