//! Two-wire bus transactions
//!
//! Sequences the primitives of a [`TwiController`](chronoswitch_hal::TwiController)
//! into complete read and write transfers with bounded retry.

pub mod transaction;

#[cfg(test)]
pub(crate) mod sim;

pub use transaction::{AddressWidth, BusAddress, BusError, TwiBus, MAX_ITER};
