use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

pub type DoctorId = i64;
pub type AppointmentId = i64;

/// Wire format for timestamps: local ISO-8601 without offset, always UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub work_days: Vec<u8>, // 0 = Sunday, 1 = Monday, etc.
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDoctor {
    pub name: String,
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub work_days: Vec<u8>,
}

impl NewDoctor {
    pub fn into_doctor(self, id: DoctorId) -> Doctor {
        Doctor {
            id,
            name: self.name,
            work_start: self.work_start,
            work_end: self.work_end,
            work_days: self.work_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub doctor_id: DoctorId,
    #[serde(with = "local_timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "local_timestamp")]
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub doctor_id: DoctorId,
    #[serde(with = "local_timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "local_timestamp")]
    pub end_time: DateTime<Utc>,
}

impl NewAppointment {
    pub fn into_appointment(self, id: AppointmentId) -> Appointment {
        Appointment {
            id,
            doctor_id: self.doctor_id,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

/// Half-open interval overlap: `[a_start, a_end)` and `[b_start, b_end)`
/// share at least one instant. Touching endpoints do not overlap.
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

/// Accepts RFC 3339 (any offset, converted to UTC) or a naive local
/// timestamp with optional fractional seconds, which is read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

pub mod local_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(instant))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 7, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let cases = [
            ((at(14, 0), at(14, 45)), (at(14, 20), at(15, 5)), true),
            ((at(14, 0), at(14, 45)), (at(14, 45), at(15, 0)), false),
            ((at(14, 0), at(15, 0)), (at(14, 15), at(14, 30)), true),
            ((at(9, 0), at(9, 15)), (at(10, 0), at(10, 15)), false),
        ];

        for ((a_start, a_end), (b_start, b_end), expected) in cases {
            assert_eq!(intervals_overlap(a_start, a_end, b_start, b_end), expected);
            assert_eq!(intervals_overlap(b_start, b_end, a_start, a_end), expected);
        }
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2030-01-07T14:00:00"), Some(at(14, 0)));
        assert_eq!(parse_timestamp("2030-01-07T14:00:00.000123").map(|t| t.timestamp()), Some(at(14, 0).timestamp()));
        assert_eq!(parse_timestamp("2030-01-07T16:00:00+02:00"), Some(at(14, 0)));
        assert_eq!(parse_timestamp("2030-01-07T14:00:00Z"), Some(at(14, 0)));
        assert_eq!(parse_timestamp("next tuesday"), None);
    }

    #[test]
    fn test_appointment_serializes_local_format() {
        let appointment = Appointment {
            id: 1,
            doctor_id: 2,
            start_time: at(14, 0),
            end_time: at(14, 45),
        };

        let value = serde_json::to_value(&appointment).unwrap();
        assert_eq!(value["start_time"], "2030-01-07T14:00:00");
        assert_eq!(value["end_time"], "2030-01-07T14:45:00");

        let back: Appointment = serde_json::from_value(value).unwrap();
        assert_eq!(back, appointment);
    }
}
