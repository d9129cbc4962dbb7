//! Due-action scheduler
//!
//! Once per elapsed minute the scheduler works out which stored actions
//! became due since the previous check and transmits each exactly once.

pub mod checker;
pub mod source;

pub use checker::{CheckMode, CheckReport, DueAction, Scheduler, MAX_REPORTED_ACTIONS};
pub use source::ScheduleSource;
