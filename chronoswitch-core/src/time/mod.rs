//! Calendar time as kept by the real-time clock

pub mod bcd;
pub mod datetime;

pub use datetime::{Datetime, MINUTES_PER_DAY};
