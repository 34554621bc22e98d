use crate::config::Config;
use signet_store::RasterStore;
use std::sync::Arc;

/// Shared application state accessible to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Holds the current signature
    pub store: Arc<dyn RasterStore>,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn RasterStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
