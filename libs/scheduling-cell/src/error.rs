use thiserror::Error;

use shared_database::SupabaseError;
use shared_models::error::AppError;

/// Rejected schedule parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("minute of day {0} is outside 00:00..=24:00")]
    OutOfRange(u16),

    #[error("operating window {start}..{end} is empty")]
    EmptyWindow { start: u16, end: u16 },

    #[error("slot step must be a positive number of minutes")]
    ZeroStep,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("store rejected the request: {0}")]
    Rejected(String),

    #[error("malformed store response: {0}")]
    Malformed(String),
}

impl From<SupabaseError> for StoreError {
    fn from(err: SupabaseError) -> Self {
        if err.is_retryable() {
            return StoreError::Unavailable(err.to_string());
        }
        match err {
            SupabaseError::UniqueViolation(msg) => StoreError::UniqueViolation(msg),
            SupabaseError::Decode(msg) => StoreError::Malformed(msg),
            other => StoreError::Rejected(other.to_string()),
        }
    }
}

/// Outcome of a failed availability query or booking attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("validation failed for: {}", .0.join(", "))]
    ValidationFailed(Vec<String>),

    #[error("the requested slot is already taken")]
    SlotTaken,

    #[error("booking store unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("{0} not found")]
    NotFound(String),
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            // The partial unique index is the authoritative conflict signal.
            StoreError::UniqueViolation(_) => BookingError::SlotTaken,
            other => BookingError::UpstreamUnavailable(other.to_string()),
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::ValidationFailed(fields) => AppError::ValidationFailed { fields },
            BookingError::SlotTaken => {
                AppError::Conflict("This time slot is no longer available".to_string())
            }
            BookingError::UpstreamUnavailable(msg) => AppError::Unavailable(msg),
            BookingError::NotFound(what) => AppError::NotFound(format!("{} not found", what)),
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError::Internal(format!("Invalid schedule configuration: {}", err))
    }
}
