//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in chronoswitch-core:
//!
//! - Remote-control transmitters (PT2262 over a 433 MHz module)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod remote;
