use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use shared_database::SchedulingStore;
use shared_models::scheduling::intervals_overlap;
use shared_models::{Appointment, DoctorId};

use crate::models::AppointmentError;

pub struct ConflictDetectionService {
    store: Arc<dyn SchedulingStore>,
}

impl ConflictDetectionService {
    pub fn new(store: Arc<dyn SchedulingStore>) -> Self {
        Self { store }
    }

    /// Existing appointments of `doctor_id` overlapping `[start_time, end_time)`.
    pub async fn check_conflicts(
        &self,
        doctor_id: DoctorId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Checking conflicts for doctor {} from {} to {}",
               doctor_id, start_time, end_time);

        let mut conflicting = self.store
            .find_overlapping(doctor_id, start_time, end_time)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        conflicting.retain(|apt| {
            intervals_overlap(apt.start_time, apt.end_time, start_time, end_time)
        });

        if !conflicting.is_empty() {
            warn!("Conflict detected for doctor {} - {} conflicting appointments",
                  doctor_id, conflicting.len());
        }

        Ok(conflicting)
    }

    pub async fn has_conflict(
        &self,
        doctor_id: DoctorId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<bool, AppointmentError> {
        Ok(!self.check_conflicts(doctor_id, start_time, end_time).await?.is_empty())
    }
}
