pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use error::{BookingError, ScheduleError, StoreError};
pub use models::*;
pub use services::*;
