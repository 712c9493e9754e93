use std::env;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_OPEN_TIME: &str = "09:00";
pub const DEFAULT_CLOSE_TIME: &str = "21:00";
pub const DEFAULT_SLOT_STEP_MINUTES: u16 = 30;

/// How a candidate slot is tested against an already booked appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// `[a, a+dA)` and `[b, b+dB)` conflict iff `a < b+dB && b < a+dA`.
    Symmetric,
    /// Booked start `b` blocks candidate `a` iff `|a-b| < requested duration`.
    /// Kept for parity checks against the legacy booking flow.
    RequestedDurationOnly,
}

impl OverlapPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "symmetric" => Some(Self::Symmetric),
            "legacy" | "requested_duration_only" => Some(Self::RequestedDurationOnly),
            _ => None,
        }
    }
}

/// Raw scheduling settings. Times are minute-of-day in the salon's local time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSettings {
    pub open_minute: u16,
    pub close_minute: u16,
    pub slot_step_minutes: u16,
    pub overlap_policy: OverlapPolicy,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            open_minute: 9 * 60,
            close_minute: 21 * 60,
            slot_step_minutes: DEFAULT_SLOT_STEP_MINUTES,
            overlap_policy: OverlapPolicy::Symmetric,
        }
    }
}

impl ScheduleSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let open_minute = setting_or("SALON_OPEN_TIME", parse_clock, defaults.open_minute);
        let close_minute = setting_or("SALON_CLOSE_TIME", parse_clock, defaults.close_minute);
        let slot_step_minutes = setting_or(
            "SALON_SLOT_STEP_MINUTES",
            |v| v.trim().parse::<u16>().ok().filter(|step| *step > 0),
            defaults.slot_step_minutes,
        );
        let overlap_policy = match env::var("SALON_OVERLAP_POLICY") {
            Ok(value) => OverlapPolicy::parse(&value).unwrap_or_else(|| {
                warn!("Unknown SALON_OVERLAP_POLICY '{}', using symmetric", value);
                OverlapPolicy::Symmetric
            }),
            Err(_) => defaults.overlap_policy,
        };

        if open_minute >= close_minute {
            warn!(
                "Salon opening hours {}..{} are empty, falling back to {}-{}",
                open_minute, close_minute, DEFAULT_OPEN_TIME, DEFAULT_CLOSE_TIME
            );
            return Self { slot_step_minutes, overlap_policy, ..defaults };
        }

        Self {
            open_minute,
            close_minute,
            slot_step_minutes,
            overlap_policy,
        }
    }
}

/// Reads `name` with `parse`; unset keeps `default` quietly, unparsable keeps it with a warning.
fn setting_or<T, F>(name: &str, parse: F, default: T) -> T
where
    T: Copy + std::fmt::Debug,
    F: Fn(&str) -> Option<T>,
{
    match env::var(name) {
        Ok(value) => parse(&value).unwrap_or_else(|| {
            warn!("Invalid {} '{}', using {:?}", name, value, default);
            default
        }),
        Err(_) => default,
    }
}

/// Parses `HH:MM` (or `HH:MM:00`) into minute-of-day. `24:00` is accepted as end of day.
/// Non-zero seconds are rejected since times are kept at minute precision.
pub fn parse_clock(value: &str) -> Option<u16> {
    let mut parts = value.trim().split(':');
    let hours: u16 = parts.next()?.parse().ok()?;
    let minutes: u16 = parts.next()?.parse().ok()?;
    if let Some(seconds) = parts.next() {
        seconds.parse::<u16>().ok().filter(|s| *s == 0)?;
    }
    if parts.next().is_some() || hours > 24 || minutes >= 60 {
        return None;
    }
    let total = hours * 60 + minutes;
    (total <= 24 * 60).then_some(total)
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_role_key: Option<String>,
    pub supabase_timeout_secs: u64,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub bind_addr: String,
    pub schedule: ScheduleSettings,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY").ok(),
            supabase_timeout_secs: env::var("SUPABASE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            session_secret: env::var("SALON_SESSION_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SALON_SESSION_SECRET not set, admin sign-in is disabled");
                    String::new()
                }),
            session_ttl_hours: env::var("SALON_SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(12),
            bind_addr: env::var("SALON_BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            schedule: ScheduleSettings::from_env(),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.session_secret.is_empty()
    }

    /// Key used for privileged table writes; falls back to the anon key.
    pub fn admin_api_key(&self) -> &str {
        self.supabase_service_role_key
            .as_deref()
            .unwrap_or(&self.supabase_anon_key)
    }
}
