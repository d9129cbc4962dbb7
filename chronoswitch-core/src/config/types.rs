//! Timer configuration
//!
//! Board builds read these values from `board.toml` at build time; any
//! field left out takes its default.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Minute tick period is zero
    ZeroTickPeriod,
    /// Serial baud rate is zero
    ZeroBaudRate,
    /// Two-wire clock outside 10 kHz to 400 kHz
    BusFrequencyOutOfRange,
    /// Radio transmitter repeats the code word zero times
    ZeroRepeats,
    /// Radio pulse unit is zero
    ZeroPulseUnit,
}

/// Timing and behaviour settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimerConfig {
    /// Minute ticks before a disabled timer re-enables itself
    pub disable_timeout_min: u8,
    /// Period of the scheduler tick in seconds
    pub tick_period_s: u32,
    /// Serial baud rate
    pub baud_rate: u32,
    /// Two-wire clock frequency in Hz
    pub bus_frequency_hz: u32,
    /// Code word repeats per radio frame
    pub transmit_repeats: u8,
    /// Radio pulse unit in microseconds
    pub pulse_unit_us: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            disable_timeout_min: 10,
            tick_period_s: 60,
            baud_rate: 9600,
            bus_frequency_hz: 100_000,
            transmit_repeats: 4,
            pulse_unit_us: 375,
        }
    }
}

impl TimerConfig {
    /// Check the settings for values the firmware cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_s == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::ZeroBaudRate);
        }
        if !(10_000..=400_000).contains(&self.bus_frequency_hz) {
            return Err(ConfigError::BusFrequencyOutOfRange);
        }
        if self.transmit_repeats == 0 {
            return Err(ConfigError::ZeroRepeats);
        }
        if self.pulse_unit_us == 0 {
            return Err(ConfigError::ZeroPulseUnit);
        }
        Ok(())
    }
}
