//! Two-wire bus abstractions
//!
//! Unlike a transfer-level I2C trait, [`TwiController`] exposes the
//! individual bus primitives (start, stop, byte transfer, acknowledge) and
//! the status code the bus controller reports after each one. The protocol
//! state machine that sequences these primitives lives in
//! `chronoswitch-core`.

/// Status reported by the bus controller after a primitive completes
///
/// The numeric codes are the standard two-wire master status codes. Both
/// transmitter and receiver mode report arbitration loss as `0x38`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TwiStatus {
    /// START condition transmitted
    Start,
    /// Repeated START condition transmitted
    RepeatedStart,
    /// Address + write transmitted, ACK received
    MtSlaAck,
    /// Address + write transmitted, NACK received
    MtSlaNack,
    /// Data byte transmitted, ACK received
    MtDataAck,
    /// Data byte transmitted, NACK received
    MtDataNack,
    /// Arbitration lost
    ArbitrationLost,
    /// Address + read transmitted, ACK received
    MrSlaAck,
    /// Address + read transmitted, NACK received
    MrSlaNack,
    /// Data byte received, ACK returned
    MrDataAck,
    /// Data byte received, NACK returned
    MrDataNack,
    /// No relevant state information available
    NoInfo,
    /// Illegal START or STOP condition detected
    BusError,
    /// Any other status code
    Other(u8),
}

impl TwiStatus {
    /// Decode a raw status code
    pub fn from_code(code: u8) -> Self {
        // Prescaler bits are not part of the status
        match code & 0xF8 {
            0x08 => TwiStatus::Start,
            0x10 => TwiStatus::RepeatedStart,
            0x18 => TwiStatus::MtSlaAck,
            0x20 => TwiStatus::MtSlaNack,
            0x28 => TwiStatus::MtDataAck,
            0x30 => TwiStatus::MtDataNack,
            0x38 => TwiStatus::ArbitrationLost,
            0x40 => TwiStatus::MrSlaAck,
            0x48 => TwiStatus::MrSlaNack,
            0x50 => TwiStatus::MrDataAck,
            0x58 => TwiStatus::MrDataNack,
            0xF8 => TwiStatus::NoInfo,
            0x00 => TwiStatus::BusError,
            other => TwiStatus::Other(other),
        }
    }

    /// Get the raw status code
    pub fn code(self) -> u8 {
        match self {
            TwiStatus::Start => 0x08,
            TwiStatus::RepeatedStart => 0x10,
            TwiStatus::MtSlaAck => 0x18,
            TwiStatus::MtSlaNack => 0x20,
            TwiStatus::MtDataAck => 0x28,
            TwiStatus::MtDataNack => 0x30,
            TwiStatus::ArbitrationLost => 0x38,
            TwiStatus::MrSlaAck => 0x40,
            TwiStatus::MrSlaNack => 0x48,
            TwiStatus::MrDataAck => 0x50,
            TwiStatus::MrDataNack => 0x58,
            TwiStatus::NoInfo => 0xF8,
            TwiStatus::BusError => 0x00,
            TwiStatus::Other(code) => code,
        }
    }
}

/// The controller did not signal completion within its bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TwiTimeout;

/// Two-wire bus master
///
/// Each primitive only *issues* the bus operation. Callers must then call
/// [`wait_for_complete`](TwiController::wait_for_complete) before reading
/// [`status`](TwiController::status) or [`data`](TwiController::data).
///
/// Implementations block (busy-wait) inside `wait_for_complete`; they must
/// bound that wait and report [`TwiTimeout`] instead of hanging.
pub trait TwiController {
    /// Issue a START (or repeated START) condition
    fn send_start(&mut self);

    /// Issue a STOP condition, releasing the bus
    fn send_stop(&mut self);

    /// Transmit one byte (address or data)
    fn send_byte(&mut self, byte: u8);

    /// Clock in one byte and acknowledge it
    fn receive_ack(&mut self);

    /// Clock in one byte and do not acknowledge it (ends a read)
    fn receive_nack(&mut self);

    /// Wait until the last issued primitive has completed
    fn wait_for_complete(&mut self) -> Result<(), TwiTimeout>;

    /// Status code of the last completed primitive
    fn status(&self) -> TwiStatus;

    /// Last byte clocked in by `receive_ack`/`receive_nack`
    fn data(&self) -> u8;
}

impl<T: TwiController + ?Sized> TwiController for &mut T {
    fn send_start(&mut self) {
        (**self).send_start()
    }

    fn send_stop(&mut self) {
        (**self).send_stop()
    }

    fn send_byte(&mut self, byte: u8) {
        (**self).send_byte(byte)
    }

    fn receive_ack(&mut self) {
        (**self).receive_ack()
    }

    fn receive_nack(&mut self) {
        (**self).receive_nack()
    }

    fn wait_for_complete(&mut self) -> Result<(), TwiTimeout> {
        (**self).wait_for_complete()
    }

    fn status(&self) -> TwiStatus {
        (**self).status()
    }

    fn data(&self) -> u8 {
        (**self).data()
    }
}

/// Two-wire bus configuration
#[derive(Debug, Clone, Copy)]
pub struct TwiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for TwiConfig {
    fn default() -> Self {
        Self {
            frequency: 100_000, // 100kHz standard mode
        }
    }
}

impl TwiConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self { frequency: 400_000 };

    /// Half of one SCL period in microseconds (at least 1)
    pub fn half_period_us(&self) -> u32 {
        (500_000 / self.frequency.max(1)).max(1)
    }
}
