use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::SchedulingStore;

use crate::locks::DoctorLocks;

/// Shared router state handed to every cell.
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn SchedulingStore>,
    pub doctor_locks: Arc<DoctorLocks>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn SchedulingStore>) -> Self {
        Self {
            config,
            store,
            doctor_locks: Arc::new(DoctorLocks::new()),
        }
    }

    /// State wired to whatever store the configuration selects.
    pub fn from_config(config: AppConfig) -> Self {
        let store = shared_database::connect(&config);
        Self::new(config, store)
    }
}
