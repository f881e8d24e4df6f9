//! Read-only status dashboard with a manual build trigger

use std::sync::Arc;

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::http::BuildServer;

/// Dashboard state shared across handlers
pub struct DashboardState {
    pub build_server: Arc<dyn BuildServer>,
    pub webhook_url: String,
    pub job: String,
}

/// Notice rendered under the page header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub webhook_url: String,
    pub job: String,
    pub notice: Option<Notice>,
}

impl DashboardTemplate {
    fn new(state: &DashboardState, notice: Option<Notice>) -> Self {
        Self {
            webhook_url: state.webhook_url.clone(),
            job: state.job.clone(),
            notice,
        }
    }
}

pub fn dashboard_router(state: Arc<DashboardState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/trigger", post(trigger_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn index_handler(
    State(state): State<Arc<DashboardState>>,
) -> Result<Html<String>, StatusCode> {
    render(DashboardTemplate::new(&state, None))
}

async fn trigger_handler(
    State(state): State<Arc<DashboardState>>,
) -> Result<Html<String>, StatusCode> {
    info!("Manual build trigger from dashboard");

    let result = state.build_server.trigger_build().await;
    let notice = match result.failure_message() {
        Some(message) => Notice {
            message,
            is_error: true,
        },
        None => Notice {
            message: "Build triggered successfully!".to_string(),
            is_error: false,
        },
    };

    render(DashboardTemplate::new(&state, Some(notice)))
}

fn render(template: DashboardTemplate) -> Result<Html<String>, StatusCode> {
    template.render().map(Html).map_err(|e| {
        error!("Failed to render dashboard: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
