use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use shared_config::{parse_clock, OverlapPolicy, ScheduleSettings};

use crate::error::ScheduleError;

pub use catalog_cell::models::{Service, Stylist};

pub const MINUTES_PER_DAY: u16 = 24 * 60;

// ==============================================================================
// TIME OF DAY
// ==============================================================================

/// Minutes since local midnight, `0..=1440`. Serialized as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    pub fn new(minute: u16) -> Result<Self, ScheduleError> {
        if minute > MINUTES_PER_DAY {
            return Err(ScheduleError::OutOfRange(minute));
        }
        Ok(Self(minute))
    }

    /// Accepts `HH:MM` and the `HH:MM:SS` form Postgres returns for `time` columns.
    pub fn parse(value: &str) -> Option<Self> {
        parse_clock(value).map(Self)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    /// End of an interval of `duration` minutes starting here. May run past midnight.
    pub fn end_after(self, duration: u32) -> u32 {
        u32::from(self.0) + duration
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for MinuteOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MinuteOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid time of day '{}'", raw)))
    }
}

// ==============================================================================
// SCHEDULE CONFIGURATION
// ==============================================================================

/// Opening hours for one day: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingWindow {
    start: MinuteOfDay,
    end: MinuteOfDay,
}

impl OperatingWindow {
    pub fn new(start: MinuteOfDay, end: MinuteOfDay) -> Result<Self, ScheduleError> {
        if start >= end {
            return Err(ScheduleError::EmptyWindow { start: start.0, end: end.0 });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> MinuteOfDay {
        self.start
    }

    pub fn end(&self) -> MinuteOfDay {
        self.end
    }

    /// Whether `[slot, slot + duration)` lies within the window.
    pub fn fits(&self, slot: MinuteOfDay, duration: u32) -> bool {
        slot >= self.start && slot.end_after(duration) <= u32::from(self.end.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotStep(u16);

impl SlotStep {
    pub fn new(minutes: u16) -> Result<Self, ScheduleError> {
        if minutes == 0 {
            return Err(ScheduleError::ZeroStep);
        }
        Ok(Self(minutes))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }
}

/// Validated scheduling parameters, injected into the generator, filter and committer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub window: OperatingWindow,
    pub step: SlotStep,
    pub overlap_policy: OverlapPolicy,
}

impl ScheduleConfig {
    pub fn new(window: OperatingWindow, step: SlotStep, overlap_policy: OverlapPolicy) -> Self {
        Self { window, step, overlap_policy }
    }

    /// Whether `time` is one of the generated slot starts.
    pub fn is_slot(&self, time: MinuteOfDay) -> bool {
        time >= self.window.start
            && time < self.window.end
            && (time.0 - self.window.start.0) % self.step.0 == 0
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            window: OperatingWindow { start: MinuteOfDay(9 * 60), end: MinuteOfDay(21 * 60) },
            step: SlotStep(30),
            overlap_policy: OverlapPolicy::Symmetric,
        }
    }
}

impl TryFrom<&ScheduleSettings> for ScheduleConfig {
    type Error = ScheduleError;

    fn try_from(settings: &ScheduleSettings) -> Result<Self, Self::Error> {
        let window = OperatingWindow::new(
            MinuteOfDay::new(settings.open_minute)?,
            MinuteOfDay::new(settings.close_minute)?,
        )?;
        Ok(Self {
            window,
            step: SlotStep::new(settings.slot_step_minutes)?,
            overlap_policy: settings.overlap_policy,
        })
    }
}

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Pending and confirmed appointments hold their slot.
    pub fn is_active(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Active,
    Only(AppointmentStatus),
    All,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: i64,
    pub stylist_id: i64,
    pub service_id: i64,
    pub date: NaiveDate,
    pub time: MinuteOfDay,
    /// Service duration at booking time. Absent on rows written before it was recorded.
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: String,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Row written by the booking committer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewAppointment {
    pub stylist_id: i64,
    pub service_id: i64,
    pub date: NaiveDate,
    pub time: MinuteOfDay,
    pub duration_minutes: u32,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: String,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// A booking attempt as submitted. Selections stay optional or raw so a missing
/// or malformed value is reported as a field error rather than a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookingRequest {
    #[serde(default)]
    pub stylist_id: Option<i64>,
    #[serde(default)]
    pub service_id: Option<i64>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(flatten)]
    pub client: ClientInfo,
}

/// Selections of a request that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingSelection {
    pub stylist_id: i64,
    pub service_id: i64,
    pub date: NaiveDate,
    pub time: MinuteOfDay,
}

/// A booked interval `[start, start + duration)` used by the overlap test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedInterval {
    pub start: MinuteOfDay,
    pub duration: u32,
}

// ==============================================================================
// AVAILABILITY RESPONSE
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
}

impl DayPart {
    pub fn of(slot: MinuteOfDay) -> Self {
        match slot.0 {
            m if m < 12 * 60 => DayPart::Morning,
            m if m < 17 * 60 => DayPart::Afternoon,
            _ => DayPart::Evening,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DayAvailability {
    pub morning: Vec<MinuteOfDay>,
    pub afternoon: Vec<MinuteOfDay>,
    pub evening: Vec<MinuteOfDay>,
}

impl DayAvailability {
    pub fn group(slots: &[MinuteOfDay]) -> Self {
        let mut grouped = Self::default();
        for &slot in slots {
            match DayPart::of(slot) {
                DayPart::Morning => grouped.morning.push(slot),
                DayPart::Afternoon => grouped.afternoon.push(slot),
                DayPart::Evening => grouped.evening.push(slot),
            }
        }
        grouped
    }

    pub fn is_empty(&self) -> bool {
        self.morning.is_empty() && self.afternoon.is_empty() && self.evening.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlotAvailability {
    pub stylist_id: i64,
    pub service_id: i64,
    pub date: NaiveDate,
    pub duration_minutes: u32,
    pub slots: Vec<MinuteOfDay>,
    pub day_parts: DayAvailability,
}
