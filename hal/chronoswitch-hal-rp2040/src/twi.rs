//! Bit-banged two-wire bus master
//!
//! The RP2040's I2C block only exposes whole transfers, so the bus
//! primitives are generated in software on two GPIOs wired open-drain with
//! external pull-ups. A line is driven low by switching its pin to output
//! (the output latch is held low) and released by switching it back to
//! input.
//!
//! Each primitive is latched when issued and clocked out inside
//! [`wait_for_complete`](TwiController::wait_for_complete). Afterwards the
//! standard master status code describing the result is available from
//! [`status`](TwiController::status), so the protocol engine sees the same
//! codes a hardware two-wire controller would report.

use chronoswitch_hal::{TwiConfig, TwiController, TwiStatus, TwiTimeout};
use embassy_rp::gpio::{Flex, Pull};
use embassy_time::{block_for, Duration, Instant};

/// Longest a slave may hold SCL low (clock stretching)
const STRETCH_LIMIT: Duration = Duration::from_millis(25);

/// Clock pulses sent to free a slave stuck mid-byte
const RECOVERY_CLOCKS: u8 = 9;

/// Primitive waiting to be clocked out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Start,
    Byte(u8),
    Receive { ack: bool },
}

/// Direction selected by the last address byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// After START, next byte selects a device
    Selecting,
    Transmit,
    Receive,
}

/// Two-wire master on a pair of GPIOs
pub struct BitBangTwi<'d> {
    scl: Flex<'d>,
    sda: Flex<'d>,
    half_period: Duration,
    pending: Option<Pending>,
    /// Bus is held between START and STOP
    owned: bool,
    mode: Mode,
    status: TwiStatus,
    data: u8,
}

impl<'d> BitBangTwi<'d> {
    /// Set up both pins released, with internal pull-ups as a fallback
    pub fn new(mut scl: Flex<'d>, mut sda: Flex<'d>, config: TwiConfig) -> Self {
        for pin in [&mut scl, &mut sda] {
            pin.set_pull(Pull::Up);
            pin.set_low();
            pin.set_as_input();
        }
        Self {
            scl,
            sda,
            half_period: Duration::from_micros(config.half_period_us() as u64),
            pending: None,
            owned: false,
            mode: Mode::Selecting,
            status: TwiStatus::NoInfo,
            data: 0,
        }
    }

    fn delay(&self) {
        block_for(self.half_period);
    }

    fn drive_low(pin: &mut Flex<'d>) {
        pin.set_as_output();
    }

    fn release(pin: &mut Flex<'d>) {
        pin.set_as_input();
    }

    /// Release SCL and wait for any slave holding it low
    fn scl_high(&mut self) -> Result<(), TwiTimeout> {
        Self::release(&mut self.scl);
        let deadline = Instant::now() + STRETCH_LIMIT;
        while self.scl.is_low() {
            if Instant::now() >= deadline {
                return Err(TwiTimeout);
            }
        }
        Ok(())
    }

    /// Give up the bus after losing arbitration
    fn yield_bus(&mut self) {
        Self::release(&mut self.sda);
        Self::release(&mut self.scl);
        self.owned = false;
        self.mode = Mode::Selecting;
    }

    /// Clock SCL until a stuck slave lets go of SDA
    fn recover(&mut self) -> Result<bool, TwiTimeout> {
        for _ in 0..RECOVERY_CLOCKS {
            if self.sda.is_high() {
                return Ok(true);
            }
            Self::drive_low(&mut self.scl);
            self.delay();
            self.scl_high()?;
            self.delay();
        }
        Ok(self.sda.is_high())
    }

    fn start(&mut self) -> Result<TwiStatus, TwiTimeout> {
        let repeated = self.owned;
        if repeated {
            // SCL is low after the previous byte
            Self::release(&mut self.sda);
            self.delay();
            self.scl_high()?;
            self.delay();
        } else if self.scl.is_low() || self.sda.is_low() {
            if self.scl.is_low() {
                self.scl_high()?;
            }
            if !self.recover()? {
                return Ok(TwiStatus::BusError);
            }
        }

        // Another master pulled SDA low first
        if self.sda.is_low() {
            self.yield_bus();
            return Ok(TwiStatus::ArbitrationLost);
        }

        Self::drive_low(&mut self.sda);
        self.delay();
        Self::drive_low(&mut self.scl);
        self.owned = true;
        self.mode = Mode::Selecting;

        Ok(if repeated {
            TwiStatus::RepeatedStart
        } else {
            TwiStatus::Start
        })
    }

    /// Clock out one bit; `Ok(false)` if arbitration was lost
    fn write_bit(&mut self, bit: bool) -> Result<bool, TwiTimeout> {
        if bit {
            Self::release(&mut self.sda);
        } else {
            Self::drive_low(&mut self.sda);
        }
        self.delay();
        self.scl_high()?;
        let lost = bit && self.sda.is_low();
        self.delay();
        Self::drive_low(&mut self.scl);
        Ok(!lost)
    }

    fn read_bit(&mut self) -> Result<bool, TwiTimeout> {
        Self::release(&mut self.sda);
        self.delay();
        self.scl_high()?;
        let bit = self.sda.is_high();
        self.delay();
        Self::drive_low(&mut self.scl);
        Ok(bit)
    }

    fn send(&mut self, byte: u8) -> Result<TwiStatus, TwiTimeout> {
        if !self.owned {
            return Ok(TwiStatus::NoInfo);
        }
        for i in (0..8).rev() {
            if !self.write_bit(byte >> i & 0x01 != 0)? {
                self.yield_bus();
                return Ok(TwiStatus::ArbitrationLost);
            }
        }
        let acked = !self.read_bit()?;

        let status = match self.mode {
            Mode::Selecting if byte & 0x01 != 0 => {
                self.mode = Mode::Receive;
                if acked {
                    TwiStatus::MrSlaAck
                } else {
                    TwiStatus::MrSlaNack
                }
            }
            Mode::Selecting => {
                self.mode = Mode::Transmit;
                if acked {
                    TwiStatus::MtSlaAck
                } else {
                    TwiStatus::MtSlaNack
                }
            }
            Mode::Transmit if acked => TwiStatus::MtDataAck,
            Mode::Transmit => TwiStatus::MtDataNack,
            // Writing while in receiver mode is a protocol error
            Mode::Receive => TwiStatus::BusError,
        };
        Ok(status)
    }

    fn receive(&mut self, ack: bool) -> Result<TwiStatus, TwiTimeout> {
        if !self.owned || self.mode != Mode::Receive {
            return Ok(TwiStatus::BusError);
        }
        let mut byte = 0u8;
        for _ in 0..8 {
            byte = (byte << 1) | self.read_bit()? as u8;
        }
        self.data = byte;
        // ACK drives SDA low, NACK leaves it released
        self.write_bit(!ack)?;
        Ok(if ack {
            TwiStatus::MrDataAck
        } else {
            TwiStatus::MrDataNack
        })
    }
}

impl TwiController for BitBangTwi<'_> {
    fn send_start(&mut self) {
        self.pending = Some(Pending::Start);
    }

    fn send_stop(&mut self) {
        self.pending = None;
        Self::drive_low(&mut self.sda);
        self.delay();
        // A stuck clock leaves the bus owned by the slave; nothing to do here
        let _ = self.scl_high();
        self.delay();
        Self::release(&mut self.sda);
        self.delay();
        self.owned = false;
        self.mode = Mode::Selecting;
        self.status = TwiStatus::NoInfo;
    }

    fn send_byte(&mut self, byte: u8) {
        self.pending = Some(Pending::Byte(byte));
    }

    fn receive_ack(&mut self) {
        self.pending = Some(Pending::Receive { ack: true });
    }

    fn receive_nack(&mut self) {
        self.pending = Some(Pending::Receive { ack: false });
    }

    fn wait_for_complete(&mut self) -> Result<(), TwiTimeout> {
        let Some(op) = self.pending.take() else {
            return Ok(());
        };
        let result = match op {
            Pending::Start => self.start(),
            Pending::Byte(byte) => self.send(byte),
            Pending::Receive { ack } => self.receive(ack),
        };
        match result {
            Ok(status) => {
                self.status = status;
                Ok(())
            }
            Err(e) => {
                self.status = TwiStatus::NoInfo;
                Err(e)
            }
        }
    }

    fn status(&self) -> TwiStatus {
        self.status
    }

    fn data(&self) -> u8 {
        self.data
    }
}
