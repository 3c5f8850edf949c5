pub mod handlers;
pub mod router;
pub mod models;
pub mod services;

pub use models::*;
pub use router::doctor_routes;
pub use services::directory::{is_working, weekday_index};
pub use services::DoctorService;
