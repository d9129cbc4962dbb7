//! Peripheral profiles and the device hub
//!
//! The profiles ([`Ds1307`], [`Eeprom24c65`]) fix each peripheral's bus
//! address and addressing width and turn bus results into typed values.
//! [`Devices`] owns the bus master together with the state derived from the
//! hardware-info record.

pub mod clock;
pub mod eeprom;

pub use clock::Ds1307;
pub use eeprom::Eeprom24c65;

use chronoswitch_hal::TwiController;

use crate::action::{ActionRecord, ActionStore, StoreError};
use crate::bus::{BusError, TwiBus};
use crate::config::HardwareInfo;
use crate::scheduler::ScheduleSource;
use crate::time::Datetime;

/// Errors from peripheral profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError {
    /// The bus transaction failed
    Bus(BusError),
    /// The device ended the transfer early
    Incomplete,
    /// The device returned bytes that do not decode
    InvalidData,
}

impl From<BusError> for DeviceError {
    fn from(e: BusError) -> Self {
        DeviceError::Bus(e)
    }
}

/// Treat a short transfer as a failure
pub(crate) fn expect_complete(transferred: usize, expected: usize) -> Result<(), DeviceError> {
    if transferred == expected {
        Ok(())
    } else {
        Err(DeviceError::Incomplete)
    }
}

/// Bus master plus the peripherals behind it
///
/// Starts with an empty store; [`load_hardware_info`](Self::load_hardware_info)
/// sizes it from the clock's hardware-info record.
pub struct Devices<T> {
    bus: TwiBus<T>,
    info: HardwareInfo,
    store: ActionStore,
}

impl<T: TwiController> Devices<T> {
    pub fn new(bus: TwiBus<T>) -> Self {
        Self {
            bus,
            info: HardwareInfo::default(),
            store: ActionStore::new(0),
        }
    }

    /// Read the hardware-info record and size the action store from it
    ///
    /// On failure the previous record and capacity are kept.
    pub fn load_hardware_info(&mut self) -> Result<HardwareInfo, DeviceError> {
        let info = Ds1307::read_hardware_info(&mut self.bus)?;
        self.info = info;
        self.store = ActionStore::new(info.action_capacity());
        Ok(info)
    }

    /// Hardware-info record loaded at boot
    pub fn hardware_info(&self) -> &HardwareInfo {
        &self.info
    }

    pub fn store(&self) -> &ActionStore {
        &self.store
    }

    pub fn bus(&self) -> &TwiBus<T> {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut TwiBus<T> {
        &mut self.bus
    }

    pub fn read_time(&mut self) -> Result<Datetime, DeviceError> {
        Ds1307::read_time(&mut self.bus)
    }

    pub fn write_time(&mut self, time: &Datetime) -> Result<(), DeviceError> {
        Ds1307::write_time(&mut self.bus, time)
    }

    /// Store a new hardware-info record
    ///
    /// Takes effect at the next boot; the running capacity is unchanged.
    pub fn write_hardware_info(&mut self, info: &HardwareInfo) -> Result<(), DeviceError> {
        Ds1307::write_hardware_info(&mut self.bus, info)
    }

    pub fn read_record(&mut self, index: u16) -> Result<ActionRecord, StoreError> {
        self.store.read_record(&mut self.bus, index)
    }

    pub fn write_record(&mut self, index: u16, record: &ActionRecord) -> Result<(), StoreError> {
        self.store.write_record(&mut self.bus, index, record)
    }

    /// Length of the valid prefix of the store, 0 on any read failure
    pub fn count_valid(&mut self) -> u16 {
        self.store.count_valid(&mut self.bus)
    }
}

impl<T: TwiController> ScheduleSource for Devices<T> {
    type Error = StoreError;

    fn now(&mut self) -> Result<Datetime, StoreError> {
        Ok(self.read_time()?)
    }

    fn capacity(&self) -> u16 {
        self.store.capacity()
    }

    fn record(&mut self, index: u16) -> Result<ActionRecord, StoreError> {
        self.read_record(index)
    }
}
