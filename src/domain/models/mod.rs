pub mod booking;
pub mod job;
