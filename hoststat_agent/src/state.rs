//! Shared agent state: the startup configuration, read-only afterwards.

use crate::config::AgentConfig;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AgentConfig>,
}

impl AppState {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}
