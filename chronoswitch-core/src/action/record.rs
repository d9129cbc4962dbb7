//! Action record
//!
//! | Offset | Field   | Meaning                               |
//! |--------|---------|---------------------------------------|
//! | 0      | valid   | non-zero if the slot holds an action  |
//! | 1      | major   | unit letter `'A'..='P'`               |
//! | 2      | minor   | unit number `1..=16`                  |
//! | 3      | day     | 0 if the date is irrelevant           |
//! | 4      | month   | 0 if the date is irrelevant           |
//! | 5      | year    |                                       |
//! | 6      | weekday | 0 if irrelevant, else ISO 1-7         |
//! | 7      | hours   |                                       |
//! | 8      | minutes |                                       |
//! | 9      | command | 0 switches off, anything else on      |

use crate::time::Datetime;
use crate::traits::{Command, UnitAddress};

/// Stored size of one record
pub const RECORD_SIZE: usize = 10;

/// One scheduled switching action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActionRecord {
    pub valid: bool,
    /// Raw unit letter; see [`unit`](Self::unit)
    pub major: u8,
    /// Raw unit number; see [`unit`](Self::unit)
    pub minor: u8,
    pub day: u8,
    pub month: u8,
    pub year: u8,
    pub weekday: u8,
    pub hours: u8,
    pub minutes: u8,
    pub command: Command,
}

impl ActionRecord {
    /// An empty slot; writing it marks the end of the schedule
    pub const INVALID: Self = Self {
        valid: false,
        major: 0,
        minor: 0,
        day: 0,
        month: 0,
        year: 0,
        weekday: 0,
        hours: 0,
        minutes: 0,
        command: Command::Off,
    };

    pub fn from_bytes(bytes: &[u8; RECORD_SIZE]) -> Self {
        Self {
            valid: bytes[0] != 0,
            major: bytes[1],
            minor: bytes[2],
            day: bytes[3],
            month: bytes[4],
            year: bytes[5],
            weekday: bytes[6],
            hours: bytes[7],
            minutes: bytes[8],
            command: Command::from_byte(bytes[9]),
        }
    }

    /// Encode for storage; the valid flag and command become 0 or 1
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        [
            self.valid as u8,
            self.major,
            self.minor,
            self.day,
            self.month,
            self.year,
            self.weekday,
            self.hours,
            self.minutes,
            self.command.to_byte(),
        ]
    }

    /// Minute of the day the action is due
    pub fn minute_of_day(&self) -> u16 {
        self.hours as u16 * 60 + self.minutes as u16
    }

    /// Whether the weekday and date constraints hold on `today`
    pub fn matches_day(&self, today: &Datetime) -> bool {
        let weekday_ok = self.weekday == 0 || self.weekday == today.weekday;
        let date_ok = self.day == 0
            || self.month == 0
            || (self.day == today.day && self.month == today.month && self.year == today.year);
        weekday_ok && date_ok
    }

    /// Target unit, if the stored id is in range
    pub fn unit(&self) -> Option<UnitAddress> {
        UnitAddress::new(self.major, self.minor)
    }
}
