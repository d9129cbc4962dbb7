//! Hardware-info record
//!
//! Written once by the manufacturer into the clock's RAM at
//! [`HARDWARE_INFO_OFFSET`]:
//!
//! | Offset | Size | Field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 1    | hardware version                        |
//! | 1      | 1    | memory type (0 internal, 1 two-wire)    |
//! | 2      | 4    | memory size in bytes, little-endian     |
//!
//! A write request carries two extra magic bytes ([`HARDWARE_INFO_MAGIC`])
//! that guard against accidental overwrites; they are not stored.

use crate::action::RECORD_SIZE;

/// Offset of the record in the clock's address space
pub const HARDWARE_INFO_OFFSET: u8 = 0x08;

/// Stored size of the record
pub const HARDWARE_INFO_SIZE: usize = 6;

/// Magic bytes that must trail a write request
pub const HARDWARE_INFO_MAGIC: [u8; 2] = [0xFE, 0xAB];

/// Version of the action record format implemented by this firmware
pub const SOFTWARE_VERSION: u8 = 2;

/// Largest memory reachable with two-byte addressing
const MAX_MEMORY_SIZE: u32 = 0x1_0000;

/// Kind of memory holding the action store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MemoryType {
    /// Microcontroller's internal EEPROM
    Internal,
    /// External two-wire EEPROM
    TwoWire,
    /// Unrecognised type byte
    Unknown(u8),
}

impl MemoryType {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => MemoryType::Internal,
            1 => MemoryType::TwoWire,
            other => MemoryType::Unknown(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            MemoryType::Internal => 0,
            MemoryType::TwoWire => 1,
            MemoryType::Unknown(other) => other,
        }
    }
}

/// Errors from hardware-info requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareInfoError {
    /// Magic bytes missing or wrong
    BadMagic,
}

/// Device hardware description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HardwareInfo {
    pub version: u8,
    pub memory_type: MemoryType,
    /// Size of the action memory in bytes
    pub memory_size: u32,
}

impl Default for HardwareInfo {
    /// An unprogrammed device: no memory, so no action slots
    fn default() -> Self {
        Self {
            version: 0,
            memory_type: MemoryType::TwoWire,
            memory_size: 0,
        }
    }
}

impl HardwareInfo {
    /// Decode the stored record
    pub fn from_bytes(bytes: &[u8; HARDWARE_INFO_SIZE]) -> Self {
        Self {
            version: bytes[0],
            memory_type: MemoryType::from_byte(bytes[1]),
            memory_size: u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]),
        }
    }

    /// Encode the stored record
    pub fn to_bytes(&self) -> [u8; HARDWARE_INFO_SIZE] {
        let size = self.memory_size.to_le_bytes();
        [
            self.version,
            self.memory_type.to_byte(),
            size[0],
            size[1],
            size[2],
            size[3],
        ]
    }

    /// Decode a write request, checking the trailing magic bytes
    pub fn from_request(request: &[u8; 8]) -> Result<Self, HardwareInfoError> {
        if request[6..] != HARDWARE_INFO_MAGIC {
            return Err(HardwareInfoError::BadMagic);
        }
        let mut stored = [0u8; HARDWARE_INFO_SIZE];
        stored.copy_from_slice(&request[..HARDWARE_INFO_SIZE]);
        Ok(Self::from_bytes(&stored))
    }

    /// Number of action records that fit in the memory
    ///
    /// Sizes beyond the two-byte address space are clamped to it.
    pub fn action_capacity(&self) -> u16 {
        (self.memory_size.min(MAX_MEMORY_SIZE) / RECORD_SIZE as u32) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        let info = HardwareInfo::from_bytes(&[3, 1, 0x00, 0x20, 0x00, 0x00]);
        assert_eq!(info.version, 3);
        assert_eq!(info.memory_type, MemoryType::TwoWire);
        assert_eq!(info.memory_size, 8192);
        assert_eq!(info.action_capacity(), 819);
    }

    #[test]
    fn test_encode() {
        let info = HardwareInfo {
            version: 1,
            memory_type: MemoryType::Internal,
            memory_size: 0x0001_0203,
        };
        assert_eq!(info.to_bytes(), [1, 0, 0x03, 0x02, 0x01, 0x00]);
    }

    #[test]
    fn test_request_magic() {
        let good = [2, 1, 0x00, 0x20, 0, 0, 0xFE, 0xAB];
        assert_eq!(HardwareInfo::from_request(&good).unwrap().memory_size, 8192);

        let bad = [2, 1, 0x00, 0x20, 0, 0, 0xAB, 0xFE];
        assert_eq!(
            HardwareInfo::from_request(&bad),
            Err(HardwareInfoError::BadMagic)
        );
    }

    #[test]
    fn test_capacity_clamped() {
        let info = HardwareInfo {
            memory_size: u32::MAX,
            ..Default::default()
        };
        assert_eq!(info.action_capacity(), 6553);
        assert_eq!(HardwareInfo::default().action_capacity(), 0);
    }
}
