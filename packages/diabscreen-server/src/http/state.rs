use std::sync::Arc;

use diabscreen_core::{RiskClassifier, ServerConfig};
use diabscreen_storage::ExpertStore;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ExpertStore>,
    pub classifier: RiskClassifier,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Classifier strategy is taken from `config.strategy`
    pub fn new(store: Arc<dyn ExpertStore>, config: ServerConfig) -> Self {
        Self {
            store,
            classifier: RiskClassifier::new(config.strategy),
            config: Arc::new(config),
        }
    }
}
