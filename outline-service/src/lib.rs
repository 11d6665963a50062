pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use services::OutlineGateway;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<OutlineGateway>,
}

impl AppState {
    pub fn new(gateway: OutlineGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}
