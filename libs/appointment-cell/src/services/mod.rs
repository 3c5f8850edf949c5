pub mod availability;
pub mod booking;
pub mod conflict;

pub use availability::AvailabilitySearchService;
pub use booking::AppointmentBookingService;
pub use conflict::ConflictDetectionService;
