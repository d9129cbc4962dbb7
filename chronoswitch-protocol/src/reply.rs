//! Reply encoding

use core::fmt::Write;

use heapless::{String, Vec};

/// Status byte for a successful request
pub const REPLY_OK: u8 = b'1';

/// Status byte for a failed or unknown request
pub const REPLY_ERROR: u8 = b'0';

/// Size of the device info reply
pub const INFO_SIZE: usize = 24;

/// Largest encoded reply
pub const MAX_REPLY_SIZE: usize = INFO_SIZE;

/// Text sent after acknowledging `J`
const VERBOSE_BANNER: &[u8] = b"\r\nVerbose On\r\n";

/// Device description returned by `H`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceInfo {
    pub hardware_version: u8,
    pub software_version: u8,
    /// Action memory size in bytes
    pub memory_size: u32,
    /// Length of the valid record prefix
    pub valid_records: u16,
}

impl DeviceInfo {
    /// Encode as 24 ASCII bytes
    ///
    /// | Bytes | Content                                      |
    /// |-------|----------------------------------------------|
    /// | 0-2   | hardware version, space padded               |
    /// | 3-5   | software version, space padded               |
    /// | 6-10  | memory size, zero padded, first five digits  |
    /// | 11-15 | valid record count, zero padded              |
    /// | 16-23 | `"00000000"`, reserved                       |
    pub fn encode(&self) -> [u8; INFO_SIZE] {
        let mut out = [b'0'; INFO_SIZE];
        Self::put(&mut out[0..3], format_args!("{:3}", self.hardware_version));
        Self::put(&mut out[3..6], format_args!("{:3}", self.software_version));
        Self::put(&mut out[6..11], format_args!("{:05}", self.memory_size));
        Self::put(&mut out[11..16], format_args!("{:05}", self.valid_records));
        out
    }

    /// Format into a fixed-width field, truncating on the right
    fn put(field: &mut [u8], args: core::fmt::Arguments<'_>) {
        let mut text: String<16> = String::new();
        // u32 needs at most 10 digits
        let _ = text.write_fmt(args);
        for (dst, src) in field.iter_mut().zip(text.as_bytes()) {
            *dst = *src;
        }
    }
}

/// A reply to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    Ok,
    Error,
    /// Client-order date and time bytes
    Time([u8; 7]),
    /// Raw action record bytes
    Record([u8; 10]),
    Info(DeviceInfo),
    /// `'1'` followed by a banner line
    VerboseOn,
}

impl Reply {
    /// Status reply for a request outcome
    pub fn status(ok: bool) -> Self {
        if ok {
            Reply::Ok
        } else {
            Reply::Error
        }
    }

    /// Encode the reply bytes
    pub fn encode(&self) -> Vec<u8, MAX_REPLY_SIZE> {
        let mut out = Vec::new();
        // Every variant fits in MAX_REPLY_SIZE
        match self {
            Reply::Ok => {
                let _ = out.push(REPLY_OK);
            }
            Reply::Error => {
                let _ = out.push(REPLY_ERROR);
            }
            Reply::Time(bytes) => {
                let _ = out.extend_from_slice(bytes);
            }
            Reply::Record(bytes) => {
                let _ = out.extend_from_slice(bytes);
            }
            Reply::Info(info) => {
                let _ = out.extend_from_slice(&info.encode());
            }
            Reply::VerboseOn => {
                let _ = out.push(REPLY_OK);
                let _ = out.extend_from_slice(VERBOSE_BANNER);
            }
        }
        out
    }
}
