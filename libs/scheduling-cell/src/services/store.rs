use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::error::StoreError;
use crate::models::{Appointment, NewAppointment, Service, StatusFilter, Stylist};

/// Persistence consumed by availability and booking.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Appointments for one stylist and day, ordered by start time.
    async fn list_appointments(
        &self,
        stylist_id: i64,
        date: NaiveDate,
        filter: StatusFilter,
    ) -> Result<Vec<Appointment>, StoreError>;

    async fn insert_appointment(&self, record: &NewAppointment) -> Result<Appointment, StoreError>;

    async fn list_services(&self) -> Result<Vec<Service>, StoreError>;

    async fn get_service(&self, service_id: i64) -> Result<Option<Service>, StoreError>;

    async fn get_stylist(&self, stylist_id: i64) -> Result<Option<Stylist>, StoreError>;
}

fn status_clause(filter: StatusFilter) -> String {
    match filter {
        StatusFilter::Active => "&status=in.(pending,confirmed)".to_string(),
        StatusFilter::Only(status) => format!("&status=eq.{}", status),
        StatusFilter::All => String::new(),
    }
}

pub struct SupabaseAppointmentStore {
    supabase: SupabaseClient,
}

impl SupabaseAppointmentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Store acting with the service-role key, for admin bookings.
    pub fn privileged(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::privileged(config),
        }
    }
}

#[async_trait]
impl AppointmentStore for SupabaseAppointmentStore {
    async fn list_appointments(
        &self,
        stylist_id: i64,
        date: NaiveDate,
        filter: StatusFilter,
    ) -> Result<Vec<Appointment>, StoreError> {
        let path = format!(
            "/rest/v1/appointments?stylist_id=eq.{}&date=eq.{}{}&order=time.asc",
            stylist_id,
            date.format("%Y-%m-%d"),
            status_clause(filter)
        );
        let appointments: Vec<Appointment> = self.supabase.request(Method::GET, &path, None).await?;
        debug!("Fetched {} appointments for stylist {} on {}", appointments.len(), stylist_id, date);
        Ok(appointments)
    }

    async fn insert_appointment(&self, record: &NewAppointment) -> Result<Appointment, StoreError> {
        let body = serde_json::to_value(record)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        let rows: Vec<Appointment> = self.supabase
            .returning(Method::POST, "/rest/v1/appointments", body)
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Malformed("insert returned no rows".to_string()))
    }

    async fn list_services(&self) -> Result<Vec<Service>, StoreError> {
        let services: Vec<Service> = self.supabase
            .request(Method::GET, "/rest/v1/services?order=id.asc", None)
            .await?;
        Ok(services)
    }

    async fn get_service(&self, service_id: i64) -> Result<Option<Service>, StoreError> {
        let path = format!("/rest/v1/services?id=eq.{}", service_id);
        let services: Vec<Service> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(services.into_iter().next())
    }

    async fn get_stylist(&self, stylist_id: i64) -> Result<Option<Stylist>, StoreError> {
        let path = format!("/rest/v1/stylists?id=eq.{}", stylist_id);
        let stylists: Vec<Stylist> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(stylists.into_iter().next())
    }
}
