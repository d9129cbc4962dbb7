//! Request decoding
//!
//! Opcodes and payloads:
//! - `A` enable the timer
//! - `B` disable the timer
//! - `C` read the clock
//! - `D` set the clock (7 bytes: day, month, year, weekday, hours, minutes, seconds)
//! - `E` read an action record (2 bytes: index, little-endian)
//! - `F` write an action record (2 bytes index + 10 bytes record)
//! - `G` switch a unit now (3 bytes: major, minor, command)
//! - `H` read device info
//! - `I` write hardware info (8 bytes, manufacturer only)
//! - `J` turn verbose tracing on
//! - `K` halt until reset

use heapless::Vec;

/// Request opcodes
pub mod opcode {
    pub const ENABLE: u8 = b'A';
    pub const DISABLE: u8 = b'B';
    pub const GET_TIME: u8 = b'C';
    pub const SET_TIME: u8 = b'D';
    pub const GET_RECORD: u8 = b'E';
    pub const SET_RECORD: u8 = b'F';
    pub const SWITCH: u8 = b'G';
    pub const GET_INFO: u8 = b'H';
    pub const SET_INFO: u8 = b'I';
    pub const VERBOSE: u8 = b'J';
    pub const HALT: u8 = b'K';
}

/// Largest request payload (`F`)
pub const MAX_PAYLOAD_SIZE: usize = 12;

/// Errors that can occur during request parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Byte is not a known opcode
    UnknownCommand(u8),
}

/// A decoded host request
///
/// Payloads are kept as raw bytes; range checks belong to the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request {
    Enable,
    Disable,
    GetTime,
    /// Client-order date and time bytes
    SetTime([u8; 7]),
    GetRecord { index: u16 },
    SetRecord { index: u16, record: [u8; 10] },
    Switch { major: u8, minor: u8, command: u8 },
    GetInfo,
    /// Hardware-info record followed by two magic bytes
    SetInfo([u8; 8]),
    Verbose,
    Halt,
}

impl Request {
    /// Payload length for an opcode, or `None` if the opcode is unknown
    pub fn payload_len(op: u8) -> Option<usize> {
        match op {
            opcode::ENABLE
            | opcode::DISABLE
            | opcode::GET_TIME
            | opcode::GET_INFO
            | opcode::VERBOSE
            | opcode::HALT => Some(0),
            opcode::SET_TIME => Some(7),
            opcode::GET_RECORD => Some(2),
            opcode::SET_RECORD => Some(12),
            opcode::SWITCH => Some(3),
            opcode::SET_INFO => Some(8),
            _ => None,
        }
    }

    /// Opcode of this request
    pub fn opcode(&self) -> u8 {
        match self {
            Request::Enable => opcode::ENABLE,
            Request::Disable => opcode::DISABLE,
            Request::GetTime => opcode::GET_TIME,
            Request::SetTime(_) => opcode::SET_TIME,
            Request::GetRecord { .. } => opcode::GET_RECORD,
            Request::SetRecord { .. } => opcode::SET_RECORD,
            Request::Switch { .. } => opcode::SWITCH,
            Request::GetInfo => opcode::GET_INFO,
            Request::SetInfo(_) => opcode::SET_INFO,
            Request::Verbose => opcode::VERBOSE,
            Request::Halt => opcode::HALT,
        }
    }

    /// Build a request from an opcode and its complete payload
    fn decode(op: u8, payload: &[u8]) -> Option<Self> {
        let request = match op {
            opcode::ENABLE => Request::Enable,
            opcode::DISABLE => Request::Disable,
            opcode::GET_TIME => Request::GetTime,
            opcode::SET_TIME => Request::SetTime(payload.try_into().ok()?),
            opcode::GET_RECORD => Request::GetRecord {
                index: u16::from_le_bytes([payload[0], payload[1]]),
            },
            opcode::SET_RECORD => Request::SetRecord {
                index: u16::from_le_bytes([payload[0], payload[1]]),
                record: payload[2..].try_into().ok()?,
            },
            opcode::SWITCH => Request::Switch {
                major: payload[0],
                minor: payload[1],
                command: payload[2],
            },
            opcode::GET_INFO => Request::GetInfo,
            opcode::SET_INFO => Request::SetInfo(payload.try_into().ok()?),
            opcode::VERBOSE => Request::Verbose,
            opcode::HALT => Request::Halt,
            _ => return None,
        };
        Some(request)
    }
}

/// Byte-at-a-time request parser
#[derive(Debug, Clone)]
pub struct RequestParser {
    state: ParseState,
    buffer: Vec<u8, MAX_PAYLOAD_SIZE>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for an opcode
    WaitingForOpcode,
    /// Reading the payload of `op`
    ReadingPayload { op: u8, len: usize },
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForOpcode,
            buffer: Vec::new(),
        }
    }

    /// Drop any partially received request
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForOpcode;
        self.buffer.clear();
    }

    /// Whether the parser is between requests
    pub fn is_idle(&self) -> bool {
        self.state == ParseState::WaitingForOpcode
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(request))` when a request is complete, `Ok(None)`
    /// when more bytes are needed, or `Err` for an unknown opcode. Unknown
    /// opcodes are not followed by a payload, so the next byte is read as
    /// an opcode again.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Request>, ParseError> {
        match self.state {
            ParseState::WaitingForOpcode => {
                let len = Request::payload_len(byte).ok_or(ParseError::UnknownCommand(byte))?;
                if len == 0 {
                    return Ok(Request::decode(byte, &[]));
                }
                self.buffer.clear();
                self.state = ParseState::ReadingPayload { op: byte, len };
                Ok(None)
            }
            ParseState::ReadingPayload { op, len } => {
                // Cannot overflow: len <= MAX_PAYLOAD_SIZE
                let _ = self.buffer.push(byte);
                if self.buffer.len() < len {
                    return Ok(None);
                }
                let request = Request::decode(op, &self.buffer);
                self.reset();
                Ok(request)
            }
        }
    }
}
