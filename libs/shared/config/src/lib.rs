use std::env;
use std::str::FromStr;
use tracing::warn;

/// Longest availability horizon honoured; larger values are clamped.
pub const MAX_AVAILABILITY_HORIZON_DAYS: u32 = 366;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub server_port: u16,
    /// Let the availability search continue into the following days instead
    /// of stopping once the probe passes the doctor's end of day.
    pub availability_rollover: bool,
    pub availability_horizon_days: u32,
    /// Also reject bookings whose end instant falls outside working hours.
    pub enforce_end_within_hours: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            server_port: 3000,
            availability_rollover: false,
            availability_horizon_days: 14,
            enforce_end_within_hours: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using in-memory store");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            server_port: parse_var("SERVER_PORT", defaults.server_port),
            availability_rollover: parse_var("AVAILABILITY_ROLLOVER", defaults.availability_rollover),
            availability_horizon_days: clamp_horizon(parse_var(
                "AVAILABILITY_HORIZON_DAYS",
                defaults.availability_horizon_days,
            )),
            enforce_end_within_hours: parse_var(
                "ENFORCE_END_WITHIN_HOURS",
                defaults.enforce_end_within_hours,
            ),
        };

        if config.supabase_url.is_empty() != config.supabase_anon_key.is_empty() {
            warn!("Supabase only partially configured - falling back to in-memory store");
        }

        config
    }

    /// Both Supabase settings are present, so the remote store can be used.
    pub fn is_database_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }
}

fn clamp_horizon(days: u32) -> u32 {
    if days > MAX_AVAILABILITY_HORIZON_DAYS {
        warn!("AVAILABILITY_HORIZON_DAYS={} exceeds {}, clamping",
              days, MAX_AVAILABILITY_HORIZON_DAYS);
        return MAX_AVAILABILITY_HORIZON_DAYS;
    }
    days
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default {:?}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
