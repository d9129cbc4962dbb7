//! Simulated two-wire bus for host tests
//!
//! Models byte-addressable slave devices with an internal address pointer,
//! plus injectable faults (busy devices, NACKs, arbitration loss, forced
//! status codes, timeouts). Every primitive is recorded as a [`BusEvent`].

use std::vec;
use std::vec::Vec;

use chronoswitch_hal::{TwiController, TwiStatus, TwiTimeout};

use super::transaction::{AddressWidth, BusAddress};

/// A primitive issued on the simulated bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    Start,
    Stop,
    Byte(u8),
    ReceiveAck,
    ReceiveNack,
}

/// A simulated slave device
#[derive(Debug, Clone)]
pub struct SimDevice {
    pub address: BusAddress,
    pub memory: Vec<u8>,
    pub pointer: u16,
    /// Number of upcoming selections to NACK (device busy)
    pub busy_selections: u32,
    /// NACK address bytes after selection
    pub nack_address: bool,
    /// NACK data bytes in write mode
    pub write_protected: bool,
    /// NACK read selection when the pointer is at or beyond this offset
    pub fail_reads_from: Option<u16>,
}

impl SimDevice {
    pub fn new(address: BusAddress, size: usize) -> Self {
        Self {
            address,
            memory: vec![0; size],
            pointer: 0,
            busy_selections: 0,
            nack_address: false,
            write_protected: false,
            fail_reads_from: None,
        }
    }

    fn address_bytes(&self) -> u8 {
        match self.address.width() {
            AddressWidth::One => 1,
            AddressWidth::Two => 2,
        }
    }

    fn advance(&mut self) {
        self.pointer = ((self.pointer as usize + 1) % self.memory.len()) as u16;
    }
}

#[derive(Debug, Clone, Copy)]
struct Selection {
    device: usize,
    read: bool,
    address_bytes_left: u8,
    pending_pointer: u16,
}

/// Simulated bus controller with attached devices
#[derive(Debug, Default)]
pub struct SimBus {
    devices: Vec<SimDevice>,
    events: Vec<BusEvent>,
    in_transaction: bool,
    selection: Option<Selection>,
    status: Option<TwiStatus>,
    data: u8,
    /// Index of the next primitive that reports a status
    op_index: usize,
    forced: Vec<(usize, TwiStatus)>,
    timeouts: Vec<usize>,
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, device: SimDevice) {
        self.devices.push(device);
    }

    pub fn device_mut(&mut self, address: BusAddress) -> &mut SimDevice {
        self.devices
            .iter_mut()
            .find(|d| d.address == address)
            .expect("device not attached")
    }

    pub fn device(&self, address: BusAddress) -> &SimDevice {
        self.devices
            .iter()
            .find(|d| d.address == address)
            .expect("device not attached")
    }

    /// Report `status` for the primitive with index `op` (0-based, STOP not counted)
    pub fn force_status_at(&mut self, op: usize, status: TwiStatus) {
        self.forced.push((op, status));
    }

    /// Report arbitration loss for the primitive with index `op`
    pub fn lose_arbitration_at(&mut self, op: usize) {
        self.force_status_at(op, TwiStatus::ArbitrationLost);
    }

    /// Time out waiting for the primitive with index `op`
    pub fn time_out_at(&mut self, op: usize) {
        self.timeouts.push(op);
    }

    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    pub fn start_count(&self) -> usize {
        self.events.iter().filter(|e| **e == BusEvent::Start).count()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    fn complete(&mut self, event: BusEvent, natural: TwiStatus) {
        self.events.push(event);
        let forced = self
            .forced
            .iter()
            .find(|(op, _)| *op == self.op_index)
            .map(|(_, status)| *status);
        self.status = Some(forced.unwrap_or(natural));
        self.op_index += 1;
    }

    fn select(&mut self, byte: u8) -> TwiStatus {
        let read = byte & 0x01 != 0;
        let (sla_ack, sla_nack) = if read {
            (TwiStatus::MrSlaAck, TwiStatus::MrSlaNack)
        } else {
            (TwiStatus::MtSlaAck, TwiStatus::MtSlaNack)
        };

        let Some(index) = self
            .devices
            .iter()
            .position(|d| d.address.address() == byte >> 1)
        else {
            return sla_nack;
        };

        let device = &mut self.devices[index];
        if device.busy_selections > 0 {
            device.busy_selections -= 1;
            return sla_nack;
        }
        if read && device.fail_reads_from.is_some_and(|from| device.pointer >= from) {
            return sla_nack;
        }

        self.selection = Some(Selection {
            device: index,
            read,
            address_bytes_left: if read { 0 } else { device.address_bytes() },
            pending_pointer: 0,
        });
        sla_ack
    }

    fn transmit(&mut self, byte: u8) -> TwiStatus {
        let Some(mut sel) = self.selection else {
            return self.select(byte);
        };
        if sel.read {
            return TwiStatus::BusError;
        }

        let device = &mut self.devices[sel.device];
        if sel.address_bytes_left > 0 {
            if device.nack_address {
                return TwiStatus::MtDataNack;
            }
            sel.pending_pointer = (sel.pending_pointer << 8) | byte as u16;
            sel.address_bytes_left -= 1;
            if sel.address_bytes_left == 0 {
                device.pointer = (sel.pending_pointer as usize % device.memory.len()) as u16;
            }
            self.selection = Some(sel);
            return TwiStatus::MtDataAck;
        }

        if device.write_protected {
            return TwiStatus::MtDataNack;
        }
        let pointer = device.pointer as usize;
        device.memory[pointer] = byte;
        device.advance();
        TwiStatus::MtDataAck
    }

    fn receive(&mut self, ack: bool) -> TwiStatus {
        let Some(sel) = self.selection.filter(|s| s.read) else {
            return TwiStatus::BusError;
        };
        let device = &mut self.devices[sel.device];
        self.data = device.memory[device.pointer as usize];
        device.advance();
        if ack {
            TwiStatus::MrDataAck
        } else {
            TwiStatus::MrDataNack
        }
    }
}

impl TwiController for SimBus {
    fn send_start(&mut self) {
        let status = if self.in_transaction {
            TwiStatus::RepeatedStart
        } else {
            TwiStatus::Start
        };
        self.in_transaction = true;
        self.selection = None;
        self.complete(BusEvent::Start, status);
    }

    fn send_stop(&mut self) {
        self.events.push(BusEvent::Stop);
        self.in_transaction = false;
        self.selection = None;
        self.status = None;
    }

    fn send_byte(&mut self, byte: u8) {
        let status = self.transmit(byte);
        self.complete(BusEvent::Byte(byte), status);
    }

    fn receive_ack(&mut self) {
        let status = self.receive(true);
        self.complete(BusEvent::ReceiveAck, status);
    }

    fn receive_nack(&mut self) {
        let status = self.receive(false);
        self.complete(BusEvent::ReceiveNack, status);
    }

    fn wait_for_complete(&mut self) -> Result<(), TwiTimeout> {
        let last = self.op_index.wrapping_sub(1);
        if self.timeouts.contains(&last) {
            Err(TwiTimeout)
        } else {
            Ok(())
        }
    }

    fn status(&self) -> TwiStatus {
        self.status.unwrap_or(TwiStatus::NoInfo)
    }

    fn data(&self) -> u8 {
        self.data
    }
}
