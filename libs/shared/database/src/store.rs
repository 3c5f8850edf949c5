use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use shared_models::{Appointment, Doctor, DoctorId, NewAppointment, NewDoctor};

/// Persistence collaborator for the scheduling engine. Doctors are returned
/// in directory (id) order and appointments in insertion order.
#[async_trait]
pub trait SchedulingStore: Send + Sync {
    async fn count_doctors(&self) -> Result<usize>;

    /// Insert the roster only when no doctor exists yet. Returns `None` when
    /// the directory was already populated.
    async fn seed_doctors(&self, doctors: Vec<NewDoctor>) -> Result<Option<Vec<Doctor>>>;

    async fn get_doctor(&self, doctor_id: DoctorId) -> Result<Option<Doctor>>;

    async fn list_doctors(&self) -> Result<Vec<Doctor>>;

    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<Appointment>;

    /// Appointments of `doctor_id` whose `[start, end)` overlaps the given interval.
    async fn find_overlapping(
        &self,
        doctor_id: DoctorId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>>;

    /// Appointments of `doctor_id` fully contained in `[window_start, window_end]`.
    async fn find_within(
        &self,
        doctor_id: DoctorId,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>>;
}
