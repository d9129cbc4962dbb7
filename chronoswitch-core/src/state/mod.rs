//! Runtime state owned by the controller

pub mod timer;

pub use timer::TimerState;
