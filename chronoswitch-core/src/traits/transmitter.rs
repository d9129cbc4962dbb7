//! Remote-control signal transmission

/// Switch command sent to a remote unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    Off,
    On,
}

impl Command {
    /// Decode a command byte: zero is off, anything else is on
    pub fn from_byte(byte: u8) -> Self {
        if byte == 0 {
            Command::Off
        } else {
            Command::On
        }
    }

    /// Encode as a command byte
    pub fn to_byte(self) -> u8 {
        match self {
            Command::Off => 0,
            Command::On => 1,
        }
    }
}

/// Address of a remote-controlled unit
///
/// Units are grouped by a major id (`'A'..='P'`) and a minor id (`1..=16`),
/// giving 256 addressable sockets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnitAddress {
    major: u8,
    minor: u8,
}

impl UnitAddress {
    /// Lowest major id
    pub const MAJOR_FIRST: u8 = b'A';
    /// Highest major id
    pub const MAJOR_LAST: u8 = b'P';
    /// Highest minor id
    pub const MINOR_LAST: u8 = 16;

    /// Create a unit address, returning `None` when out of range
    pub fn new(major: u8, minor: u8) -> Option<Self> {
        let valid = (Self::MAJOR_FIRST..=Self::MAJOR_LAST).contains(&major)
            && (1..=Self::MINOR_LAST).contains(&minor);
        valid.then_some(Self { major, minor })
    }

    /// Major id as an ASCII letter
    pub fn major(&self) -> u8 {
        self.major
    }

    /// Minor id, 1-based
    pub fn minor(&self) -> u8 {
        self.minor
    }

    /// Major id as a zero-based index (0-15)
    pub fn major_index(&self) -> u8 {
        self.major - Self::MAJOR_FIRST
    }

    /// Minor id as a zero-based index (0-15)
    pub fn minor_index(&self) -> u8 {
        self.minor - 1
    }
}

/// Fire-and-forget transmitter for switch commands
///
/// Transmission is fixed-timing and unacknowledged: there is no way to know
/// whether the unit received it, so the call cannot fail.
pub trait SignalTransmitter {
    /// Send `command` to `unit`
    fn transmit(&mut self, unit: UnitAddress, command: Command);
}

impl<T: SignalTransmitter + ?Sized> SignalTransmitter for &mut T {
    fn transmit(&mut self, unit: UnitAddress, command: Command) {
        (**self).transmit(unit, command)
    }
}
