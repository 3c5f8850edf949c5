use chrono::{DateTime, Datelike, Utc};

use shared_models::Doctor;

/// Day of week with Sunday as 0, matching `Doctor::work_days`.
pub fn weekday_index(instant: &DateTime<Utc>) -> u8 {
    instant.weekday().num_days_from_sunday() as u8
}

/// Whether `doctor` is on duty at `instant`: a working weekday and a time of
/// day inside `[work_start, work_end]`, both bounds inclusive.
pub fn is_working(doctor: &Doctor, instant: &DateTime<Utc>) -> bool {
    let time_of_day = instant.time();

    doctor.work_days.contains(&weekday_index(instant))
        && doctor.work_start <= time_of_day
        && time_of_day <= doctor.work_end
}
