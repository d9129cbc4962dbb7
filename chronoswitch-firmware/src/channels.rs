//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use chronoswitch_protocol::{ParseError, Request};

/// Channel capacity for parsed host requests
const REQUEST_CHANNEL_SIZE: usize = 4;

/// Requests (or rejected opcodes) from the host serial link
pub static REQUEST_CHANNEL: Channel<
    CriticalSectionRawMutex,
    Result<Request, ParseError>,
    REQUEST_CHANNEL_SIZE,
> = Channel::new();

/// Raised once per scheduler tick
///
/// Ticks raised before the controller gets to the previous one coalesce.
pub static MINUTE_TICK: Signal<CriticalSectionRawMutex, ()> = Signal::new();
