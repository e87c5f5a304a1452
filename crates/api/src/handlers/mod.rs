pub mod builds;
pub mod uploads;
