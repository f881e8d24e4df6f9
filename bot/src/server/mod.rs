//! Webhook HTTP server

pub mod handlers;
pub mod serve;
pub mod state;

pub use serve::{serve, webhook_router};
pub use state::ServerState;
