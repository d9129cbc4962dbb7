//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod controller;
pub mod serial;
pub mod tick;

pub use controller::{controller_task, Controller};
pub use serial::serial_rx_task;
pub use tick::tick_task;
