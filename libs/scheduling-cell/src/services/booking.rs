use std::sync::Arc;

use tracing::{info, instrument, warn};
use chrono::NaiveDate;
use uuid::Uuid;

use shared_utils::validation::{is_blank, is_valid_email, is_valid_phone};

use crate::error::BookingError;
use crate::models::{
    Appointment, AppointmentStatus, BookingRequest, BookingSelection, MinuteOfDay, NewAppointment,
    ScheduleConfig, StatusFilter,
};
use crate::services::availability::{booked_intervals, AvailabilityFilter};
use crate::services::store::AppointmentStore;

/// Validates, re-checks and inserts a booking. Ordering between concurrent
/// attempts comes from the store's unique index on active slots.
pub struct BookingCommitter {
    store: Arc<dyn AppointmentStore>,
    schedule: ScheduleConfig,
    initial_status: AppointmentStatus,
}

impl BookingCommitter {
    pub fn new(store: Arc<dyn AppointmentStore>, schedule: ScheduleConfig) -> Self {
        Self {
            store,
            schedule,
            initial_status: AppointmentStatus::Pending,
        }
    }

    /// Status given to newly inserted appointments. Cancelled is not an initial state.
    pub fn with_initial_status(mut self, status: AppointmentStatus) -> Self {
        if status.is_active() {
            self.initial_status = status;
        }
        self
    }

    /// Collects every failing field; returns the parsed selections when all pass.
    pub fn validate(&self, request: &BookingRequest) -> Result<BookingSelection, BookingError> {
        let mut fields = Vec::new();

        if is_blank(&request.client.name) {
            fields.push("name".to_string());
        }
        if !is_valid_phone(&request.client.phone) {
            fields.push("phone".to_string());
        }
        if !is_valid_email(&request.client.email) {
            fields.push("email".to_string());
        }

        if request.stylist_id.is_none() {
            fields.push("stylist_id".to_string());
        }
        if request.service_id.is_none() {
            fields.push("service_id".to_string());
        }
        let date = NaiveDate::parse_from_str(request.date.trim(), "%Y-%m-%d").ok();
        if date.is_none() {
            fields.push("date".to_string());
        }
        let time = MinuteOfDay::parse(&request.time).filter(|t| self.schedule.is_slot(*t));
        if time.is_none() {
            fields.push("time".to_string());
        }

        match (request.stylist_id, request.service_id, date, time) {
            (Some(stylist_id), Some(service_id), Some(date), Some(time)) if fields.is_empty() => {
                Ok(BookingSelection { stylist_id, service_id, date, time })
            }
            _ => Err(BookingError::ValidationFailed(fields)),
        }
    }

    #[instrument(
        skip_all,
        fields(
            attempt_id = %Uuid::new_v4(),
            stylist_id = ?request.stylist_id,
            service_id = ?request.service_id,
            date = %request.date,
            time = %request.time
        )
    )]
    pub async fn attempt_book(&self, request: &BookingRequest) -> Result<Appointment, BookingError> {
        let selection = self.validate(request).inspect_err(|e| warn!("Booking rejected: {}", e))?;
        let BookingSelection { stylist_id, service_id, date, time } = selection;

        let service = self.store.get_service(service_id).await?
            .ok_or_else(|| BookingError::NotFound(format!("Service {}", service_id)))?;
        if !self.schedule.window.fits(time, service.duration) {
            warn!("{} minute service does not fit before closing", service.duration);
            return Err(BookingError::ValidationFailed(vec!["time".to_string()]));
        }

        self.store.get_stylist(stylist_id).await?
            .ok_or_else(|| BookingError::NotFound(format!("Stylist {}", stylist_id)))?;

        // Last-instant re-check against pending and confirmed bookings.
        let existing = self.store
            .list_appointments(stylist_id, date, StatusFilter::Active)
            .await?;
        let booked = booked_intervals(self.store.as_ref(), &existing, service.duration).await?;
        let filter = AvailabilityFilter::from_config(&self.schedule);
        if !filter.is_free(time, service.duration, &booked) {
            warn!("Slot taken before commit");
            return Err(BookingError::SlotTaken);
        }

        let record = NewAppointment {
            stylist_id,
            service_id,
            date,
            time,
            duration_minutes: service.duration,
            client_name: request.client.name.trim().to_string(),
            client_phone: request.client.phone.trim().to_string(),
            client_email: request.client.email.trim().to_string(),
            status: self.initial_status,
        };

        let appointment = self.store
            .insert_appointment(&record)
            .await
            .map_err(BookingError::from)
            .inspect_err(|e| match e {
                BookingError::SlotTaken => warn!("Insert lost the race for the slot"),
                other => warn!("Insert failed: {}", other),
            })?;

        info!("Appointment {} committed as {}", appointment.id, appointment.status);
        Ok(appointment)
    }
}
