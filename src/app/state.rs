//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::game::SessionRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);

        // Initialize session registry
        let sessions = Arc::new(SessionRegistry::new(config.max_sessions, config.sim_seed));

        Self { config, sessions }
    }
}
