pub mod appointments;
pub mod auth;
pub mod lifecycle;
pub mod password;

pub use appointments::AdminAppointmentService;
pub use auth::AdminAuthService;
pub use lifecycle::AppointmentLifecycleService;
pub use password::PasswordService;
