//! Serial Command Protocol
//!
//! This crate defines the byte protocol between a host terminal and the
//! socket timer over its serial port (9600 baud, 8N1).
//!
//! # Protocol Overview
//!
//! Every request is a single ASCII opcode followed by a fixed-size binary
//! payload. There is no framing or checksum; the opcode alone determines how
//! many payload bytes follow:
//! ```text
//! ┌────────┬──────────────────────┐
//! │ OPCODE │ PAYLOAD              │
//! │ 1B     │ 0, 2, 3, 7, 8 or 12B │
//! └────────┴──────────────────────┘
//! ```
//!
//! Most requests are answered with a single status byte, `'1'` for success
//! and `'0'` for failure. Queries answer with their data instead, and send
//! nothing at all if the data cannot be read.

#![no_std]
#![deny(unsafe_code)]

pub mod reply;
pub mod request;

pub use reply::{DeviceInfo, Reply, INFO_SIZE, MAX_REPLY_SIZE, REPLY_ERROR, REPLY_OK};
pub use request::{opcode, ParseError, Request, RequestParser, MAX_PAYLOAD_SIZE};
