//! Board-agnostic core logic for the socket timer firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Two-wire bus transaction engine (retry, arbitration recovery)
//! - Device profiles for the real-time clock and the schedule EEPROM
//! - Date/time and hardware-info record codecs
//! - Action record store and the per-minute due-action scheduler
//! - Timer enable/disable state
//! - Serial command execution
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod action;
pub mod bus;
pub mod command;
pub mod config;
pub mod device;
pub mod scheduler;
pub mod state;
pub mod time;
pub mod traits;
