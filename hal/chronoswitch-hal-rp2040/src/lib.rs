//! RP2040-specific HAL for the socket timer firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `chronoswitch-hal` traits:
//!
//! - Bit-banged two-wire bus master on two open-drain GPIOs
//!   (implements `chronoswitch_hal::TwiController`)

#![no_std]

pub mod twi;

pub use twi::BitBangTwi;

// Re-export shared traits from chronoswitch-hal for convenience
pub use chronoswitch_hal::{TwiConfig, TwiController, TwiStatus};
