use anyhow::Result;
use chrono::{Datelike, Days, NaiveDate};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use scheduling_cell::{Appointment, AppointmentStatus};
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

/// Sunday and Saturday of the week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = u64::from(date.weekday().num_days_from_sunday());
    let start = date - Days::new(offset);
    (start, start + Days::new(6))
}

pub struct AdminAppointmentService {
    supabase: SupabaseClient,
}

impl AdminAppointmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::privileged(config),
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Appointment>> {
        let appointments: Vec<Appointment> = self.supabase
            .request(Method::GET, "/rest/v1/appointments?order=date.asc,time.asc", None)
            .await?;
        debug!("Listed {} appointments", appointments.len());
        Ok(appointments)
    }

    pub async fn get(&self, appointment_id: i64) -> Result<Option<Appointment>> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let appointments: Vec<Appointment> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(appointments.into_iter().next())
    }

    /// All statuses, ordered by day then start time.
    pub async fn weekly_schedule(&self, stylist_id: i64, date: NaiveDate) -> Result<(NaiveDate, NaiveDate, Vec<Appointment>)> {
        let (start, end) = week_bounds(date);
        let path = format!(
            "/rest/v1/appointments?stylist_id=eq.{}&date=gte.{}&date=lte.{}&order=date.asc,time.asc",
            stylist_id,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );
        let appointments: Vec<Appointment> = self.supabase.request(Method::GET, &path, None).await?;
        Ok((start, end, appointments))
    }

    /// Moves an appointment from `from` to `to`. The filter on the current status makes the
    /// update a no-op if another administrator changed it first; `None` is returned then.
    pub async fn update_status(
        &self,
        appointment_id: i64,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<Option<Appointment>> {
        let path = format!("/rest/v1/appointments?id=eq.{}&status=eq.{}", appointment_id, from);
        let rows: Vec<Appointment> = self.supabase
            .returning(Method::PATCH, &path, json!({ "status": to }))
            .await?;

        if let Some(appointment) = rows.first() {
            info!("Appointment {} moved from {} to {}", appointment.id, from, to);
        }
        Ok(rows.into_iter().next())
    }

    pub async fn delete(&self, appointment_id: i64) -> Result<()> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        self.supabase.execute(Method::DELETE, &path, None).await?;
        info!("Deleted appointment {}", appointment_id);
        Ok(())
    }
}
