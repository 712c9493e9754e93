use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use scheduling_cell::{Appointment, AppointmentStatus, BookingRequest};
use shared_models::error::AppError;

/// Row of `admin_users`. `password_hash` is an argon2 PHC string.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleQuery {
    pub stylist_id: i64,
    pub date: NaiveDate,
}

/// Booking entered from the admin panel. Defaults to pending like customer bookings.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminBookingRequest {
    #[serde(flatten)]
    pub booking: BookingRequest,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
}

/// Appointments of one stylist for the Sunday to Saturday week containing a date.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklySchedule {
    pub stylist_id: i64,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub appointments: Vec<Appointment>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdminError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Appointment {0} not found")]
    AppointmentNotFound(i64),

    #[error("Cannot change appointment status from {from} to {to}")]
    InvalidStatusTransition { from: AppointmentStatus, to: AppointmentStatus },

    #[error("Appointment {0} changed while it was being updated")]
    ConcurrentUpdate(i64),
}

impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::InvalidCredentials => AppError::Auth(err.to_string()),
            AdminError::AppointmentNotFound(_) => AppError::NotFound(err.to_string()),
            AdminError::InvalidStatusTransition { .. } | AdminError::ConcurrentUpdate(_) => {
                AppError::Conflict(err.to_string())
            }
        }
    }
}
