pub mod error;
pub mod scheduling;
pub mod validation;

pub use error::AppError;
pub use scheduling::{Appointment, AppointmentId, Doctor, DoctorId, NewAppointment, NewDoctor};
pub use validation::FieldErrors;
