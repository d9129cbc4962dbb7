//! Bus transaction engine
//!
//! A read is two bus cycles: the device is selected in transmitter mode to
//! set its address pointer, then reselected with a repeated START in
//! receiver mode. Every byte but the last is ACKed; the last is NACKed so
//! the device stops driving the bus. A write needs only the first cycle,
//! with the data bytes following the address bytes.
//!
//! Each protocol step is a [`Phase`]. [`Transaction::step`] issues the
//! primitive for one phase, inspects the resulting status, and returns a
//! [`Step`] telling the driving loop in [`TwiBus::run`] what to do next.

use chronoswitch_hal::{TwiController, TwiStatus};

/// Maximum number of attempts per transaction
///
/// A device that is busy completing an internal write cycle NACKs its
/// selection. At 100 kHz a START plus address takes about 10 µs and an
/// EEPROM write cycle is at most ~10 ms, so a responsive device answers
/// well within 100 attempts. The bound also stops a missing or broken
/// device from hanging the caller.
pub const MAX_ITER: u8 = 200;

/// Number of address bytes a device expects after its selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressWidth {
    /// Devices with 256 locations or fewer
    One,
    /// Larger devices (high byte first)
    Two,
}

/// Identity of a peripheral on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusAddress {
    address: u8,
    width: AddressWidth,
}

impl BusAddress {
    /// Create a bus address from a 7-bit device address
    pub const fn new(address: u8, width: AddressWidth) -> Self {
        Self {
            address: address & 0x7F,
            width,
        }
    }

    /// 7-bit device address
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Address width of the device
    pub const fn width(&self) -> AddressWidth {
        self.width
    }

    /// Selection byte for transmitter mode (R/W bit clear)
    pub const fn write_byte(&self) -> u8 {
        self.address << 1
    }

    /// Selection byte for receiver mode (R/W bit set)
    pub const fn read_byte(&self) -> u8 {
        (self.address << 1) | 0x01
    }
}

/// Errors from bus transactions
///
/// Every error except [`BusError::NotInStart`] is reported after the bus
/// has been released with a STOP condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// The controller did not enter a START condition; the bus was never owned
    NotInStart,
    /// Device NACKed an address byte, a data byte, or its read selection
    Nack,
    /// A step ended with a status the protocol does not expect
    UnexpectedStatus(u8),
    /// Busy-device or arbitration restarts used up the attempt budget
    RetriesExhausted,
    /// The controller did not complete a step in time
    Timeout,
}

impl BusError {
    fn releases_bus(self) -> bool {
        self != BusError::NotInStart
    }
}

/// Protocol step of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Initial START condition
    Start,
    /// Device selection in transmitter mode
    SelectWrite,
    /// High address byte (two-byte devices only)
    AddressHigh,
    /// Low address byte
    AddressLow,
    /// Repeated START before reading
    RepeatedStart,
    /// Device selection in receiver mode
    SelectRead,
    /// Clocking in data bytes
    Receive,
    /// Sending data bytes
    Transmit,
}

/// Outcome of one protocol step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Proceed to the given phase
    Continue(Phase),
    /// Restart the whole transaction from the initial START
    RetryFromStart,
    /// Transfer complete; release the bus
    Finish,
    /// Give up with an error
    Abort(BusError),
}

enum Transfer<'a> {
    Read(&'a mut [u8]),
    Write(&'a [u8]),
}

impl Transfer<'_> {
    fn len(&self) -> usize {
        match self {
            Transfer::Read(buf) => buf.len(),
            Transfer::Write(data) => data.len(),
        }
    }
}

struct Transaction<'a> {
    device: BusAddress,
    offset: u16,
    transfer: Transfer<'a>,
    /// Bytes transferred in the current attempt
    count: usize,
}

impl Transaction<'_> {
    /// Execute one phase against the controller
    fn step<T: TwiController>(&mut self, bus: &mut T, phase: Phase) -> Step {
        match phase {
            Phase::Start | Phase::RepeatedStart => {
                let initial = phase == Phase::Start;
                bus.send_start();
                if bus.wait_for_complete().is_err() {
                    return if initial {
                        Step::Abort(BusError::NotInStart)
                    } else {
                        Step::Abort(BusError::Timeout)
                    };
                }
                match bus.status() {
                    TwiStatus::Start | TwiStatus::RepeatedStart if initial => {
                        Step::Continue(Phase::SelectWrite)
                    }
                    TwiStatus::Start | TwiStatus::RepeatedStart => {
                        Step::Continue(Phase::SelectRead)
                    }
                    TwiStatus::ArbitrationLost => Step::RetryFromStart,
                    // Bus never owned: no STOP
                    _ if initial => Step::Abort(BusError::NotInStart),
                    // The device is selected and holds the bus until STOP
                    other => Step::Abort(BusError::UnexpectedStatus(other.code())),
                }
            }
            Phase::SelectWrite => {
                bus.send_byte(self.device.write_byte());
                match Self::settle(bus) {
                    Ok(TwiStatus::MtSlaAck) => match self.device.width() {
                        AddressWidth::Two => Step::Continue(Phase::AddressHigh),
                        AddressWidth::One => Step::Continue(Phase::AddressLow),
                    },
                    // Device busy with an internal write cycle
                    Ok(TwiStatus::MtSlaNack) => Step::RetryFromStart,
                    Ok(TwiStatus::ArbitrationLost) => Step::RetryFromStart,
                    Ok(other) => Step::Abort(BusError::UnexpectedStatus(other.code())),
                    Err(e) => Step::Abort(e),
                }
            }
            Phase::AddressHigh => {
                bus.send_byte((self.offset >> 8) as u8);
                Self::after_address_byte(bus, Step::Continue(Phase::AddressLow))
            }
            Phase::AddressLow => {
                bus.send_byte((self.offset & 0xFF) as u8);
                let next = match &self.transfer {
                    Transfer::Read(_) => Step::Continue(Phase::RepeatedStart),
                    Transfer::Write(data) if data.is_empty() => Step::Finish,
                    Transfer::Write(_) => Step::Continue(Phase::Transmit),
                };
                Self::after_address_byte(bus, next)
            }
            Phase::SelectRead => {
                bus.send_byte(self.device.read_byte());
                match Self::settle(bus) {
                    Ok(TwiStatus::MrSlaAck) if self.transfer.len() == 0 => Step::Finish,
                    Ok(TwiStatus::MrSlaAck) => Step::Continue(Phase::Receive),
                    Ok(TwiStatus::MrSlaNack) => Step::Abort(BusError::Nack),
                    Ok(TwiStatus::ArbitrationLost) => Step::RetryFromStart,
                    Ok(other) => Step::Abort(BusError::UnexpectedStatus(other.code())),
                    Err(e) => Step::Abort(e),
                }
            }
            Phase::Receive => {
                let Transfer::Read(buf) = &mut self.transfer else {
                    return Step::Abort(BusError::UnexpectedStatus(bus.status().code()));
                };
                if buf.len() - self.count == 1 {
                    bus.receive_nack();
                } else {
                    bus.receive_ack();
                }
                match Self::settle(bus) {
                    Ok(TwiStatus::MrDataAck) => {
                        buf[self.count] = bus.data();
                        self.count += 1;
                        if self.count == buf.len() {
                            Step::Finish
                        } else {
                            Step::Continue(Phase::Receive)
                        }
                    }
                    // Transfer ends here, possibly short
                    Ok(TwiStatus::MrDataNack) => {
                        buf[self.count] = bus.data();
                        self.count += 1;
                        Step::Finish
                    }
                    Ok(TwiStatus::ArbitrationLost) => Step::RetryFromStart,
                    Ok(other) => Step::Abort(BusError::UnexpectedStatus(other.code())),
                    Err(e) => Step::Abort(e),
                }
            }
            Phase::Transmit => {
                let Transfer::Write(data) = &self.transfer else {
                    return Step::Abort(BusError::UnexpectedStatus(bus.status().code()));
                };
                bus.send_byte(data[self.count]);
                match Self::settle(bus) {
                    Ok(TwiStatus::MtDataAck) => {
                        self.count += 1;
                        if self.count == data.len() {
                            Step::Finish
                        } else {
                            Step::Continue(Phase::Transmit)
                        }
                    }
                    Ok(TwiStatus::MtDataNack) => Step::Abort(BusError::Nack),
                    Ok(TwiStatus::ArbitrationLost) => Step::RetryFromStart,
                    Ok(other) => Step::Abort(BusError::UnexpectedStatus(other.code())),
                    Err(e) => Step::Abort(e),
                }
            }
        }
    }

    /// Status handling shared by both address bytes
    fn after_address_byte<T: TwiController>(bus: &mut T, next: Step) -> Step {
        match Self::settle(bus) {
            Ok(TwiStatus::MtDataAck) => next,
            Ok(TwiStatus::MtDataNack) => Step::Abort(BusError::Nack),
            Ok(TwiStatus::ArbitrationLost) => Step::RetryFromStart,
            Ok(other) => Step::Abort(BusError::UnexpectedStatus(other.code())),
            Err(e) => Step::Abort(e),
        }
    }

    /// Wait for the issued primitive and fetch its status
    fn settle<T: TwiController>(bus: &mut T) -> Result<TwiStatus, BusError> {
        bus.wait_for_complete().map_err(|_| BusError::Timeout)?;
        Ok(bus.status())
    }
}

/// Bus master owning a two-wire controller
///
/// Transactions are synchronous and run to completion; `&mut self`
/// guarantees no other transaction can interleave.
pub struct TwiBus<T> {
    controller: T,
    max_attempts: u8,
}

impl<T: TwiController> TwiBus<T> {
    /// Create a bus master with the default attempt budget ([`MAX_ITER`])
    pub fn new(controller: T) -> Self {
        Self::with_max_attempts(controller, MAX_ITER)
    }

    /// Create a bus master with a custom attempt budget (at least 1)
    pub fn with_max_attempts(controller: T, max_attempts: u8) -> Self {
        Self {
            controller,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Access the underlying controller
    pub fn controller(&self) -> &T {
        &self.controller
    }

    /// Mutable access to the underlying controller
    pub fn controller_mut(&mut self) -> &mut T {
        &mut self.controller
    }

    /// Read `buf.len()` bytes from `device` starting at `offset`
    ///
    /// Returns the number of bytes read. This equals `buf.len()` unless the
    /// device ended the transfer early.
    pub fn read(
        &mut self,
        device: BusAddress,
        offset: u16,
        buf: &mut [u8],
    ) -> Result<usize, BusError> {
        self.run(Transaction {
            device,
            offset,
            transfer: Transfer::Read(buf),
            count: 0,
        })
    }

    /// Write `data` to `device` starting at `offset`
    ///
    /// Returns the number of bytes acknowledged, which is always
    /// `data.len()`: a NACKed data byte aborts the transaction.
    pub fn write(&mut self, device: BusAddress, offset: u16, data: &[u8]) -> Result<usize, BusError> {
        self.run(Transaction {
            device,
            offset,
            transfer: Transfer::Write(data),
            count: 0,
        })
    }

    /// Drive a transaction through its phases
    fn run(&mut self, mut txn: Transaction<'_>) -> Result<usize, BusError> {
        let mut attempts: u8 = 0;

        'attempt: loop {
            if attempts >= self.max_attempts {
                return Err(BusError::RetriesExhausted);
            }
            attempts += 1;
            txn.count = 0;

            let mut phase = Phase::Start;
            loop {
                match txn.step(&mut self.controller, phase) {
                    Step::Continue(next) => phase = next,
                    Step::RetryFromStart => continue 'attempt,
                    Step::Finish => {
                        self.controller.send_stop();
                        return Ok(txn.count);
                    }
                    Step::Abort(error) => {
                        if error.releases_bus() {
                            self.controller.send_stop();
                        }
                        return Err(error);
                    }
                }
            }
        }
    }
}
