//! Server state

use std::sync::Arc;

use crate::commands::Dispatcher;

/// Webhook server state shared across handlers
pub struct ServerState {
    pub dispatcher: Arc<Dispatcher>,
}

impl ServerState {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}
