pub mod handlers;
pub mod router;
pub mod models;
pub mod services;
pub mod validation;

pub use models::*;
pub use router::appointment_routes;
pub use services::{AppointmentBookingService, AvailabilitySearchService, ConflictDetectionService};
