//! Inputs the scheduler reads from

use crate::action::ActionRecord;
use crate::time::Datetime;

/// Clock and record store seen by the scheduler
///
/// Implemented by [`Devices`](crate::device::Devices) on hardware; tests
/// substitute in-memory fakes.
pub trait ScheduleSource {
    type Error;

    /// Current local date and time
    fn now(&mut self) -> Result<Datetime, Self::Error>;

    /// Number of record slots
    fn capacity(&self) -> u16;

    /// Record in slot `index` (`index < capacity()`)
    fn record(&mut self, index: u16) -> Result<ActionRecord, Self::Error>;
}
