pub mod availability;
pub mod booking;
pub mod slots;
pub mod store;

pub use availability::{AvailabilityFilter, AvailabilityService};
pub use booking::BookingCommitter;
pub use slots::{generate_slots, Slots};
pub use store::{AppointmentStore, SupabaseAppointmentStore};
