//! Configuration types
//!
//! - [`hardware`]: the hardware-info record kept in the clock's battery-backed RAM
//! - [`types`]: firmware timing and behaviour settings

pub mod hardware;
pub mod types;

pub use hardware::{
    HardwareInfo, HardwareInfoError, MemoryType, HARDWARE_INFO_MAGIC, HARDWARE_INFO_OFFSET,
    HARDWARE_INFO_SIZE, SOFTWARE_VERSION,
};
pub use types::{ConfigError, TimerConfig};
