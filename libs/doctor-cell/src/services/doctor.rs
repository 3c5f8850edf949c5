use std::sync::Arc;

use tracing::{debug, info};

use shared_database::SchedulingStore;
use shared_models::{Doctor, DoctorId};
use shared_utils::AppState;

use crate::models::{default_roster, DoctorError};

pub struct DoctorService {
    store: Arc<dyn SchedulingStore>,
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self::with_store(Arc::clone(&state.store))
    }

    pub fn with_store(store: Arc<dyn SchedulingStore>) -> Self {
        Self { store }
    }

    /// Seed the fixed roster. A second call fails with `AlreadyInitialized`.
    pub async fn initialize_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Initializing doctor directory");

        let seeded = self.store.seed_doctors(default_roster()).await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?
            .ok_or(DoctorError::AlreadyInitialized)?;

        info!("Doctor directory initialized with {} doctors", seeded.len());
        Ok(seeded)
    }

    pub async fn get_doctor(&self, doctor_id: DoctorId) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor: {}", doctor_id);

        self.store.get_doctor(doctor_id).await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?
            .ok_or(DoctorError::NotFound)
    }

    /// All doctors in directory order.
    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        self.store.list_doctors().await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))
    }
}
