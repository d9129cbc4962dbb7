//! Host command execution
//!
//! - [`handler`]: runs a decoded [`Request`](chronoswitch_protocol::Request)
//!   against the devices and timer state
//! - [`trace`]: verbose trace lines sent to the host while tracing is on

pub mod handler;
pub mod trace;

pub use handler::{execute, Outcome};
pub use trace::{format_action, format_check, TraceLine, TRACE_LINE_SIZE};
