use std::iter::successors;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Days, TimeDelta, TimeZone, Utc};
use tracing::{debug, info};

use doctor_cell::services::directory::is_working;
use doctor_cell::DoctorService;
use shared_database::SchedulingStore;
use shared_models::{Doctor, DoctorId};
use shared_utils::AppState;

use crate::models::{AppointmentError, AvailableSlot, SearchHorizon, SLOT_PROBE_MINUTES};
use crate::services::conflict::ConflictDetectionService;

// A day holds at most this many probes; caps the same-day loop when
// work_end is so late that the probe wraps past midnight.
const PROBES_PER_DAY: usize = (24 * 60 / SLOT_PROBE_MINUTES) as usize;

pub fn probe_step() -> TimeDelta {
    TimeDelta::minutes(SLOT_PROBE_MINUTES)
}

/// Instants probed for `doctor`, in order, when searching from `after`.
/// The sequence is lazy; instants are produced only as the search consumes them.
///
/// With `SameDay` the probe starts at `after` and advances in 15-minute steps
/// while its time of day is before `work_end`. Nothing rolls over: a search
/// that starts after `work_end` yields no probes at all, and a search that
/// starts on a day off walks through that day without a match.
///
/// With `Rollover` the first day is probed the same way (stopping at
/// midnight), then each following working day of the horizon is probed from
/// `work_start`.
pub fn probe_instants<'a>(
    doctor: &'a Doctor,
    after: DateTime<Utc>,
    horizon: SearchHorizon,
) -> Box<dyn Iterator<Item = DateTime<Utc>> + Send + 'a> {
    match horizon {
        SearchHorizon::SameDay => Box::new(
            successors(Some(after), |current| current.checked_add_signed(probe_step()))
                .take_while(move |current| current.time() < doctor.work_end)
                .take(PROBES_PER_DAY),
        ),
        SearchHorizon::Rollover { days } => {
            let first_day = after.date_naive();
            let later_days = (1..=u64::from(days))
                .map_while(move |offset| first_day.checked_add_days(Days::new(offset)))
                .filter(move |date| {
                    doctor.work_days.contains(&(date.weekday().num_days_from_sunday() as u8))
                })
                .flat_map(move |date| {
                    day_probes(doctor, Utc.from_utc_datetime(&date.and_time(doctor.work_start)))
                });

            Box::new(day_probes(doctor, after).chain(later_days))
        }
    }
}

fn day_probes(
    doctor: &Doctor,
    from: DateTime<Utc>,
) -> impl Iterator<Item = DateTime<Utc>> + Send + '_ {
    let day = from.date_naive();
    successors(Some(from), |current| current.checked_add_signed(probe_step()))
        .take_while(move |current| current.date_naive() == day && current.time() < doctor.work_end)
}

pub struct AvailabilitySearchService {
    doctor_service: DoctorService,
    conflict_service: ConflictDetectionService,
    horizon: SearchHorizon,
}

impl AvailabilitySearchService {
    pub fn new(state: &AppState) -> Self {
        Self::with_store(Arc::clone(&state.store), SearchHorizon::from_config(&state.config))
    }

    pub fn with_store(store: Arc<dyn SchedulingStore>, horizon: SearchHorizon) -> Self {
        Self {
            doctor_service: DoctorService::with_store(Arc::clone(&store)),
            conflict_service: ConflictDetectionService::new(store),
            horizon,
        }
    }

    /// First open 15-minute slot at or after `after`, for `doctor_id` or for
    /// every doctor in directory order. The first match wins.
    pub async fn find_first_available(
        &self,
        after: DateTime<Utc>,
        doctor_id: Option<DoctorId>,
    ) -> Result<AvailableSlot, AppointmentError> {
        debug!("Searching first available slot after {} (doctor filter: {:?}, horizon: {:?})",
               after, doctor_id, self.horizon);

        let candidates = match doctor_id {
            Some(id) => vec![self.doctor_service.get_doctor(id).await?],
            None => self.doctor_service.list_doctors().await?,
        };

        for doctor in &candidates {
            if let Some(slot) = self.first_slot_for(doctor, after).await? {
                info!("First available slot: doctor {} at {}", doctor.id, slot.start_time);
                return Ok(slot);
            }
            debug!("No slot found for doctor {}", doctor.id);
        }

        Err(AppointmentError::NoAvailableSlot)
    }

    async fn first_slot_for(
        &self,
        doctor: &Doctor,
        after: DateTime<Utc>,
    ) -> Result<Option<AvailableSlot>, AppointmentError> {
        for start_time in probe_instants(doctor, after, self.horizon) {
            if !is_working(doctor, &start_time) {
                continue;
            }

            let end_time = start_time + probe_step();
            if !self.conflict_service.has_conflict(doctor.id, start_time, end_time).await? {
                return Ok(Some(AvailableSlot {
                    doctor_id: doctor.id,
                    doctor_name: doctor.name.clone(),
                    start_time,
                    end_time,
                }));
            }
        }

        Ok(None)
    }
}
