#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Barrier;

use scheduling_cell::{
    Appointment, AppointmentStore, BookingRequest, ClientInfo, MinuteOfDay, NewAppointment,
    Service, StatusFilter, StoreError, Stylist,
};

pub fn at(value: &str) -> MinuteOfDay {
    MinuteOfDay::parse(value).unwrap()
}

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()
}

pub fn service(id: i64, duration: u32) -> Service {
    Service {
        id,
        name: format!("Service {}", id),
        price: 1500.0,
        duration,
        category: None,
    }
}

pub fn stylist(id: i64) -> Stylist {
    Stylist {
        id,
        name: format!("Stylist {}", id),
        specialization: None,
        image_url: None,
    }
}

pub fn client() -> ClientInfo {
    ClientInfo {
        name: "Анна".to_string(),
        phone: "+7 912 345-67-89".to_string(),
        email: "anna@example.com".to_string(),
    }
}

pub fn booking_request(stylist_id: i64, service_id: i64, time: &str) -> BookingRequest {
    BookingRequest {
        stylist_id: Some(stylist_id),
        service_id: Some(service_id),
        date: day().format("%Y-%m-%d").to_string(),
        time: time.to_string(),
        client: client(),
    }
}

/// Appointment table held in memory. With `enforce_unique` it behaves like the
/// partial unique index on `(stylist_id, date, time)` for active rows. With a
/// barrier, every listing waits until all parties have taken their snapshot.
pub struct InMemoryStore {
    services: Vec<Service>,
    stylists: Vec<Stylist>,
    appointments: Mutex<Vec<Appointment>>,
    next_id: AtomicI64,
    enforce_unique: bool,
    listing_barrier: Option<Barrier>,
}

impl InMemoryStore {
    pub fn new(services: Vec<Service>, stylists: Vec<Stylist>) -> Self {
        Self {
            services,
            stylists,
            appointments: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            enforce_unique: true,
            listing_barrier: None,
        }
    }

    pub fn without_unique_index(mut self) -> Self {
        self.enforce_unique = false;
        self
    }

    pub fn with_listing_barrier(mut self, parties: usize) -> Self {
        self.listing_barrier = Some(Barrier::new(parties));
        self
    }

    pub fn seed(&self, appointment: Appointment) {
        self.appointments.lock().unwrap().push(appointment);
    }

    pub fn appointments(&self) -> Vec<Appointment> {
        self.appointments.lock().unwrap().clone()
    }
}

#[async_trait]
impl AppointmentStore for InMemoryStore {
    async fn list_appointments(
        &self,
        stylist_id: i64,
        date: NaiveDate,
        filter: StatusFilter,
    ) -> Result<Vec<Appointment>, StoreError> {
        let mut snapshot: Vec<Appointment> = self.appointments.lock().unwrap()
            .iter()
            .filter(|a| a.stylist_id == stylist_id && a.date == date)
            .filter(|a| match filter {
                StatusFilter::Active => a.status.is_active(),
                StatusFilter::Only(status) => a.status == status,
                StatusFilter::All => true,
            })
            .cloned()
            .collect();
        snapshot.sort_by_key(|a| a.time);

        if let Some(barrier) = &self.listing_barrier {
            barrier.wait().await;
        }
        Ok(snapshot)
    }

    async fn insert_appointment(&self, record: &NewAppointment) -> Result<Appointment, StoreError> {
        let mut appointments = self.appointments.lock().unwrap();

        if self.enforce_unique && record.status.is_active() {
            let clash = appointments.iter().any(|a| {
                a.status.is_active()
                    && a.stylist_id == record.stylist_id
                    && a.date == record.date
                    && a.time == record.time
            });
            if clash {
                return Err(StoreError::UniqueViolation(
                    "duplicate key value violates unique constraint \"appointments_active_slot_key\"".to_string(),
                ));
            }
        }

        let appointment = Appointment {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            stylist_id: record.stylist_id,
            service_id: record.service_id,
            date: record.date,
            time: record.time,
            duration_minutes: Some(record.duration_minutes),
            client_name: record.client_name.clone(),
            client_phone: record.client_phone.clone(),
            client_email: record.client_email.clone(),
            status: record.status,
            created_at: None,
        };
        appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn list_services(&self) -> Result<Vec<Service>, StoreError> {
        Ok(self.services.clone())
    }

    async fn get_service(&self, service_id: i64) -> Result<Option<Service>, StoreError> {
        Ok(self.services.iter().find(|s| s.id == service_id).cloned())
    }

    async fn get_stylist(&self, stylist_id: i64) -> Result<Option<Stylist>, StoreError> {
        Ok(self.stylists.iter().find(|s| s.id == stylist_id).cloned())
    }
}
