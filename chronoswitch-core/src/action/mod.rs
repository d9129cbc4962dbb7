//! Scheduled switching actions
//!
//! - [`record`]: the 10-byte action record
//! - [`store`]: fixed-capacity record slots in the schedule EEPROM

pub mod record;
pub mod store;

pub use record::{ActionRecord, RECORD_SIZE};
pub use store::{ActionStore, StoreError};
