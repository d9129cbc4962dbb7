//! 24C65 serial EEPROM
//!
//! 8 KiB behind a two-byte address. The device latches writes into a
//! 64-byte page buffer and wraps within the page, so writes are split at
//! page boundaries. After each page the device runs an internal write cycle
//! and NACKs its selection until done; the bus engine retries through that.

use chronoswitch_hal::TwiController;

use super::{expect_complete, DeviceError};
use crate::bus::{AddressWidth, BusAddress, TwiBus};

/// 24C65 on the two-wire bus
pub struct Eeprom24c65;

impl Eeprom24c65 {
    /// Fixed device address (selection byte 0xA0)
    pub const ADDRESS: BusAddress = BusAddress::new(0x50, AddressWidth::Two);

    /// Write page size in bytes
    pub const PAGE_SIZE: usize = 64;

    /// Read `buf.len()` bytes starting at `offset`
    pub fn read<T: TwiController>(
        bus: &mut TwiBus<T>,
        offset: u16,
        buf: &mut [u8],
    ) -> Result<(), DeviceError> {
        let n = bus.read(Self::ADDRESS, offset, buf)?;
        expect_complete(n, buf.len())
    }

    /// Write `data` starting at `offset`
    pub fn write<T: TwiController>(
        bus: &mut TwiBus<T>,
        offset: u16,
        data: &[u8],
    ) -> Result<(), DeviceError> {
        let mut offset = offset;
        let mut rest = data;
        while !rest.is_empty() {
            let room = Self::PAGE_SIZE - (offset as usize % Self::PAGE_SIZE);
            let (chunk, tail) = rest.split_at(room.min(rest.len()));
            let n = bus.write(Self::ADDRESS, offset, chunk)?;
            expect_complete(n, chunk.len())?;
            offset = offset.wrapping_add(chunk.len() as u16);
            rest = tail;
        }
        Ok(())
    }
}
