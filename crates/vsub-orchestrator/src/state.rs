//! Application state.

use std::sync::Arc;

use crate::config::OrchestratorConfig;
use crate::dispatch::{DispatchError, WorkerClient};
use crate::store::ProjectStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: OrchestratorConfig,
    pub store: ProjectStore,
    pub worker: Arc<WorkerClient>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: OrchestratorConfig) -> Result<Self, DispatchError> {
        let worker = WorkerClient::new(
            &config.worker_url,
            &config.worker_secret,
            &config.public_base_url,
        )?;

        Ok(Self {
            config,
            store: ProjectStore::new(),
            worker: Arc::new(worker),
        })
    }
}
