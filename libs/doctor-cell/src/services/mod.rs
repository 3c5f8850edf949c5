pub mod directory;
pub mod doctor;

pub use doctor::DoctorService;
