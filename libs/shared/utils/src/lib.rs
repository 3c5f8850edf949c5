pub mod locks;
pub mod state;
pub mod test_utils;

pub use locks::DoctorLocks;
pub use state::AppState;
