//! Chronoswitch Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits that chip-specific
//! HALs implement. The bus transaction engine in `chronoswitch-core` is
//! written against these traits only, so it runs unchanged on the target
//! and against simulated peripherals on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  chronoswitch-core (transactions, profiles) │
//! └─────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌─────────────────────────────────────────────┐
//! │  chronoswitch-hal (this crate - traits)     │
//! └─────────────────────────────────────────────┘
//!                       │
//!           ┌───────────┴───────────┐
//!           ▼                       ▼
//! ┌───────────────────┐   ┌───────────────────┐
//! │ chronoswitch-hal- │   │  host simulation  │
//! │      rp2040       │   │     (tests)       │
//! └───────────────────┘   └───────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`twi::TwiController`] - two-wire bus master primitives and status codes

#![no_std]
#![deny(unsafe_code)]

pub mod twi;

// Re-export key items at crate root for convenience
pub use twi::{TwiConfig, TwiController, TwiStatus, TwiTimeout};
