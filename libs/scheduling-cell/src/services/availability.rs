use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, instrument, warn};

use shared_config::OverlapPolicy;

use crate::error::{BookingError, StoreError};
use crate::models::{
    Appointment, BookedInterval, DayAvailability, MinuteOfDay, OperatingWindow, ScheduleConfig,
    SlotAvailability, StatusFilter,
};
use crate::services::slots::generate_slots;
use crate::services::store::AppointmentStore;

/// Pure slot filter: window fit plus the configured overlap rule.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityFilter {
    window: OperatingWindow,
    policy: OverlapPolicy,
}

impl AvailabilityFilter {
    pub fn new(window: OperatingWindow, policy: OverlapPolicy) -> Self {
        Self { window, policy }
    }

    pub fn from_config(config: &ScheduleConfig) -> Self {
        Self::new(config.window, config.overlap_policy)
    }

    /// Whether a candidate of `duration` minutes at `candidate` collides with `booked`.
    pub fn conflicts(&self, candidate: MinuteOfDay, duration: u32, booked: &BookedInterval) -> bool {
        let a = u32::from(candidate.minutes());
        let b = u32::from(booked.start.minutes());
        match self.policy {
            OverlapPolicy::Symmetric => a < b + booked.duration && b < a + duration,
            OverlapPolicy::RequestedDurationOnly => a.abs_diff(b) < duration,
        }
    }

    pub fn is_free(&self, candidate: MinuteOfDay, duration: u32, booked: &[BookedInterval]) -> bool {
        !booked.iter().any(|interval| self.conflicts(candidate, duration, interval))
    }

    /// Slots that fit the window and collide with none of `booked`, in input order.
    pub fn filter_available<I>(&self, slots: I, duration: u32, booked: &[BookedInterval]) -> Vec<MinuteOfDay>
    where
        I: IntoIterator<Item = MinuteOfDay>,
    {
        slots
            .into_iter()
            .filter(|slot| self.window.fits(*slot, duration) && self.is_free(*slot, duration, booked))
            .collect()
    }
}

/// Resolves each appointment's occupied interval. Rows without a duration snapshot
/// use their service's current duration, then `fallback_duration`.
pub async fn booked_intervals(
    store: &dyn AppointmentStore,
    appointments: &[Appointment],
    fallback_duration: u32,
) -> Result<Vec<BookedInterval>, StoreError> {
    let needs_lookup = appointments.iter().any(|a| a.duration_minutes.is_none());
    let service_durations: HashMap<i64, u32> = if needs_lookup {
        store.list_services().await?
            .into_iter()
            .map(|service| (service.id, service.duration))
            .collect()
    } else {
        HashMap::new()
    };

    let intervals = appointments
        .iter()
        .filter(|appointment| appointment.status.is_active())
        .map(|appointment| {
            let duration = appointment.duration_minutes
                .or_else(|| service_durations.get(&appointment.service_id).copied())
                .unwrap_or_else(|| {
                    warn!(
                        "Appointment {} has no known duration, assuming {} minutes",
                        appointment.id, fallback_duration
                    );
                    fallback_duration
                });
            BookedInterval { start: appointment.time, duration }
        })
        .collect();

    Ok(intervals)
}

pub struct AvailabilityService {
    store: Arc<dyn AppointmentStore>,
    schedule: ScheduleConfig,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn AppointmentStore>, schedule: ScheduleConfig) -> Self {
        Self { store, schedule }
    }

    /// Free slots for one stylist, service and day. Computed only from a completed fetch.
    #[instrument(skip(self))]
    pub async fn available_slots(
        &self,
        stylist_id: i64,
        service_id: i64,
        date: NaiveDate,
    ) -> Result<SlotAvailability, BookingError> {
        let service = self.store.get_service(service_id).await?
            .ok_or_else(|| BookingError::NotFound(format!("Service {}", service_id)))?;
        self.store.get_stylist(stylist_id).await?
            .ok_or_else(|| BookingError::NotFound(format!("Stylist {}", stylist_id)))?;

        let appointments = self.store
            .list_appointments(stylist_id, date, StatusFilter::Active)
            .await?;
        let booked = booked_intervals(self.store.as_ref(), &appointments, service.duration).await?;

        let filter = AvailabilityFilter::from_config(&self.schedule);
        let slots = filter.filter_available(
            generate_slots(&self.schedule.window, self.schedule.step),
            service.duration,
            &booked,
        );

        debug!(
            "{} of the day's slots free for stylist {} ({} booked)",
            slots.len(), stylist_id, booked.len()
        );

        Ok(SlotAvailability {
            stylist_id,
            service_id,
            date,
            duration_minutes: service.duration,
            day_parts: DayAvailability::group(&slots),
            slots,
        })
    }
}
