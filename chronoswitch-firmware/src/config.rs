//! Board configuration
//!
//! `BOARD` is generated by build.rs from board.toml, which it has already
//! validated.

use chronoswitch_core::config::TimerConfig;

include!(concat!(env!("OUT_DIR"), "/board.rs"));
