//! Date and time record
//!
//! The clock keeps its time in seven packed-BCD registers starting at
//! offset 0:
//!
//! | Offset | Field   | Range | Notes                                |
//! |--------|---------|-------|--------------------------------------|
//! | 0      | seconds | 0-59  | bit 7 is the clock-halt flag         |
//! | 1      | minutes | 0-59  |                                      |
//! | 2      | hours   | 0-23  | bit 6 selects 12-hour mode           |
//! | 3      | weekday | 1-7   | ISO numbering, Monday = 1            |
//! | 4      | day     | 1-31  |                                      |
//! | 5      | month   | 1-12  |                                      |
//! | 6      | year    | 0-99  |                                      |
//!
//! The serial protocol uses a different, binary field order; see
//! [`Datetime::from_client_bytes`].

use super::bcd;

/// Minutes in one day
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Clock-halt flag in the seconds register
const CLOCK_HALT: u8 = 0x80;

/// 12-hour mode flag in the hours register
const HOUR_MODE_12: u8 = 0x40;

/// A validated calendar date and time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Datetime {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    /// ISO weekday, Monday = 1
    pub weekday: u8,
    pub day: u8,
    pub month: u8,
    /// Two-digit year
    pub year: u8,
}

impl Datetime {
    /// Size of the clock register block
    pub const REGISTER_SIZE: usize = 7;

    /// Check every field against its decimal range
    pub fn is_valid(&self) -> bool {
        self.seconds <= 59
            && self.minutes <= 59
            && self.hours <= 23
            && (1..=7).contains(&self.weekday)
            && (1..=31).contains(&self.day)
            && (1..=12).contains(&self.month)
            && self.year <= 99
    }

    /// Minutes elapsed since local midnight
    pub fn minute_of_day(&self) -> u16 {
        self.hours as u16 * 60 + self.minutes as u16
    }

    /// Encode into clock registers
    ///
    /// Clears the clock-halt flag so the oscillator always runs, and forces
    /// 24-hour mode.
    pub fn to_registers(&self) -> [u8; Self::REGISTER_SIZE] {
        [
            bcd::from_int(self.seconds) & !CLOCK_HALT,
            bcd::from_int(self.minutes),
            bcd::from_int(self.hours) & 0x3F,
            bcd::from_int(self.weekday),
            bcd::from_int(self.day),
            bcd::from_int(self.month),
            bcd::from_int(self.year),
        ]
    }

    /// Decode clock registers
    ///
    /// Returns `None` if any field is out of range, for example a clock
    /// still in 12-hour mode or never initialised.
    pub fn from_registers(regs: &[u8; Self::REGISTER_SIZE]) -> Option<Self> {
        if regs[2] & HOUR_MODE_12 != 0 {
            return None;
        }
        let dt = Self {
            seconds: bcd::to_int(regs[0] & !CLOCK_HALT),
            minutes: bcd::to_int(regs[1]),
            hours: bcd::to_int(regs[2] & 0x3F),
            weekday: bcd::to_int(regs[3]),
            day: bcd::to_int(regs[4]),
            month: bcd::to_int(regs[5]),
            year: bcd::to_int(regs[6]),
        };
        dt.is_valid().then_some(dt)
    }

    /// Decode the serial protocol order: day, month, year, weekday, hours,
    /// minutes, seconds
    pub fn from_client_bytes(bytes: &[u8; 7]) -> Option<Self> {
        let dt = Self {
            day: bytes[0],
            month: bytes[1],
            year: bytes[2],
            weekday: bytes[3],
            hours: bytes[4],
            minutes: bytes[5],
            seconds: bytes[6],
        };
        dt.is_valid().then_some(dt)
    }

    /// Encode in serial protocol order
    pub fn to_client_bytes(&self) -> [u8; 7] {
        [
            self.day,
            self.month,
            self.year,
            self.weekday,
            self.hours,
            self.minutes,
            self.seconds,
        ]
    }
}
