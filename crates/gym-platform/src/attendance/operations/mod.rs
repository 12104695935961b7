//! Attendance Use Case Operations

pub mod check_in;
pub mod events;

pub use check_in::{CheckInUseCase, CheckInCommand};
pub use events::MemberCheckedIn;
