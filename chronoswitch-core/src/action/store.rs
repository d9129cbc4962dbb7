//! Action record slots in the schedule EEPROM
//!
//! Slot `i` lives at byte offset `i * RECORD_SIZE`. Valid records form a
//! prefix of the slots: the first invalid slot ends the schedule.

use chronoswitch_hal::TwiController;

use super::record::{ActionRecord, RECORD_SIZE};
use crate::bus::TwiBus;
use crate::device::{DeviceError, Eeprom24c65};

/// Errors from record access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Index at or beyond the store capacity
    OutOfRange,
    Device(DeviceError),
}

impl From<DeviceError> for StoreError {
    fn from(e: DeviceError) -> Self {
        StoreError::Device(e)
    }
}

/// Fixed-capacity record store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActionStore {
    capacity: u16,
}

impl ActionStore {
    pub const fn new(capacity: u16) -> Self {
        Self { capacity }
    }

    /// Number of record slots
    pub const fn capacity(&self) -> u16 {
        self.capacity
    }

    fn offset(&self, index: u16) -> Result<u16, StoreError> {
        if index >= self.capacity {
            return Err(StoreError::OutOfRange);
        }
        // capacity * RECORD_SIZE never exceeds the two-byte address space
        Ok(index * RECORD_SIZE as u16)
    }

    pub fn read_record<T: TwiController>(
        &self,
        bus: &mut TwiBus<T>,
        index: u16,
    ) -> Result<ActionRecord, StoreError> {
        let offset = self.offset(index)?;
        let mut bytes = [0u8; RECORD_SIZE];
        Eeprom24c65::read(bus, offset, &mut bytes)?;
        Ok(ActionRecord::from_bytes(&bytes))
    }

    /// Store a record
    ///
    /// An invalid record only clears the valid byte; the rest of the slot
    /// is left as it was.
    pub fn write_record<T: TwiController>(
        &self,
        bus: &mut TwiBus<T>,
        index: u16,
        record: &ActionRecord,
    ) -> Result<(), StoreError> {
        let offset = self.offset(index)?;
        let bytes = record.to_bytes();
        let data = if record.valid { &bytes[..] } else { &bytes[..1] };
        Eeprom24c65::write(bus, offset, data)?;
        Ok(())
    }

    /// Length of the valid prefix
    ///
    /// Any read failure yields 0 rather than a partial count.
    pub fn count_valid<T: TwiController>(&self, bus: &mut TwiBus<T>) -> u16 {
        for index in 0..self.capacity {
            match self.read_record(bus, index) {
                Ok(record) if record.valid => {}
                Ok(_) => return index,
                Err(_) => return 0,
            }
        }
        self.capacity
    }
}
