use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use shared_models::scheduling::intervals_overlap;
use shared_models::{Appointment, AppointmentId, Doctor, DoctorId, NewAppointment, NewDoctor};

use crate::store::SchedulingStore;

#[derive(Debug, Default)]
struct Tables {
    doctors: BTreeMap<DoctorId, Doctor>,
    appointments: Vec<Appointment>,
    last_doctor_id: DoctorId,
    last_appointment_id: AppointmentId,
}

/// Id-indexed store kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SchedulingStore for MemoryStore {
    async fn count_doctors(&self) -> Result<usize> {
        Ok(self.tables.read().await.doctors.len())
    }

    async fn seed_doctors(&self, doctors: Vec<NewDoctor>) -> Result<Option<Vec<Doctor>>> {
        let mut tables = self.tables.write().await;
        if !tables.doctors.is_empty() {
            return Ok(None);
        }

        let mut seeded = Vec::with_capacity(doctors.len());
        for new_doctor in doctors {
            tables.last_doctor_id += 1;
            let doctor = new_doctor.into_doctor(tables.last_doctor_id);
            tables.doctors.insert(doctor.id, doctor.clone());
            seeded.push(doctor);
        }

        debug!("Seeded {} doctors", seeded.len());
        Ok(Some(seeded))
    }

    async fn get_doctor(&self, doctor_id: DoctorId) -> Result<Option<Doctor>> {
        Ok(self.tables.read().await.doctors.get(&doctor_id).cloned())
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>> {
        Ok(self.tables.read().await.doctors.values().cloned().collect())
    }

    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<Appointment> {
        let mut tables = self.tables.write().await;
        if !tables.doctors.contains_key(&appointment.doctor_id) {
            return Err(anyhow!("Unknown doctor {}", appointment.doctor_id));
        }

        tables.last_appointment_id += 1;
        let stored = appointment.into_appointment(tables.last_appointment_id);
        tables.appointments.push(stored.clone());
        Ok(stored)
    }

    async fn find_overlapping(
        &self,
        doctor_id: DoctorId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .appointments
            .iter()
            .filter(|apt| apt.doctor_id == doctor_id)
            .filter(|apt| intervals_overlap(apt.start_time, apt.end_time, start, end))
            .cloned()
            .collect())
    }

    async fn find_within(
        &self,
        doctor_id: DoctorId,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .appointments
            .iter()
            .filter(|apt| apt.doctor_id == doctor_id)
            .filter(|apt| apt.start_time >= window_start && apt.end_time <= window_end)
            .cloned()
            .collect())
    }
}
