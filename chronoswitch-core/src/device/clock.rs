//! DS1307 real-time clock
//!
//! Seven time registers at offset 0, followed by battery-backed RAM that
//! holds the [`HardwareInfo`] record.

use chronoswitch_hal::TwiController;

use super::{expect_complete, DeviceError};
use crate::bus::{AddressWidth, BusAddress, TwiBus};
use crate::config::{HardwareInfo, HARDWARE_INFO_OFFSET, HARDWARE_INFO_SIZE};
use crate::time::Datetime;

/// DS1307 on the two-wire bus
pub struct Ds1307;

impl Ds1307 {
    /// Fixed device address (selection byte 0xD0)
    pub const ADDRESS: BusAddress = BusAddress::new(0x68, AddressWidth::One);

    /// Read and decode the current date and time
    ///
    /// Register contents outside the calendar ranges are
    /// [`DeviceError::InvalidData`].
    pub fn read_time<T: TwiController>(bus: &mut TwiBus<T>) -> Result<Datetime, DeviceError> {
        let mut regs = [0u8; Datetime::REGISTER_SIZE];
        let n = bus.read(Self::ADDRESS, 0, &mut regs)?;
        expect_complete(n, regs.len())?;
        Datetime::from_registers(&regs).ok_or(DeviceError::InvalidData)
    }

    /// Set the date and time, starting the oscillator
    pub fn write_time<T: TwiController>(
        bus: &mut TwiBus<T>,
        time: &Datetime,
    ) -> Result<(), DeviceError> {
        let regs = time.to_registers();
        let n = bus.write(Self::ADDRESS, 0, &regs)?;
        expect_complete(n, regs.len())
    }

    pub fn read_hardware_info<T: TwiController>(
        bus: &mut TwiBus<T>,
    ) -> Result<HardwareInfo, DeviceError> {
        let mut bytes = [0u8; HARDWARE_INFO_SIZE];
        let n = bus.read(Self::ADDRESS, HARDWARE_INFO_OFFSET as u16, &mut bytes)?;
        expect_complete(n, bytes.len())?;
        Ok(HardwareInfo::from_bytes(&bytes))
    }

    pub fn write_hardware_info<T: TwiController>(
        bus: &mut TwiBus<T>,
        info: &HardwareInfo,
    ) -> Result<(), DeviceError> {
        let bytes = info.to_bytes();
        let n = bus.write(Self::ADDRESS, HARDWARE_INFO_OFFSET as u16, &bytes)?;
        expect_complete(n, bytes.len())
    }
}
