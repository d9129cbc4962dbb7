//! Request handler

use chronoswitch_hal::TwiController;
use chronoswitch_protocol::{DeviceInfo, Reply, Request};

use crate::action::ActionRecord;
use crate::config::{HardwareInfo, SOFTWARE_VERSION};
use crate::device::Devices;
use crate::state::TimerState;
use crate::time::Datetime;
use crate::traits::{Command, SignalTransmitter, UnitAddress};

/// What the controller does after a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Send a reply
    Reply(Reply),
    /// Send nothing
    Silent,
    /// Send nothing and stop all work until reset
    Halt,
}

/// Execute a host request
pub fn execute<T, X>(
    request: &Request,
    devices: &mut Devices<T>,
    timer: &mut TimerState,
    transmitter: &mut X,
) -> Outcome
where
    T: TwiController,
    X: SignalTransmitter,
{
    match *request {
        Request::Enable => {
            timer.enable();
            Outcome::Reply(Reply::Ok)
        }
        Request::Disable => {
            timer.disable();
            Outcome::Reply(Reply::Ok)
        }
        Request::GetTime => match devices.read_time() {
            Ok(now) => Outcome::Reply(Reply::Time(now.to_client_bytes())),
            Err(_) => Outcome::Silent,
        },
        Request::SetTime(bytes) => {
            let ok = Datetime::from_client_bytes(&bytes)
                .is_some_and(|time| devices.write_time(&time).is_ok());
            Outcome::Reply(Reply::status(ok))
        }
        Request::GetRecord { index } => match devices.read_record(index) {
            Ok(record) => Outcome::Reply(Reply::Record(record.to_bytes())),
            Err(_) => Outcome::Silent,
        },
        Request::SetRecord { index, record } => {
            let record = ActionRecord::from_bytes(&record);
            let ok = devices.write_record(index, &record).is_ok();
            Outcome::Reply(Reply::status(ok))
        }
        Request::Switch {
            major,
            minor,
            command,
        } => {
            let unit = UnitAddress::new(major, minor).filter(|_| command <= 1);
            if let Some(unit) = unit {
                transmitter.transmit(unit, Command::from_byte(command));
            }
            Outcome::Reply(Reply::status(unit.is_some()))
        }
        Request::GetInfo => {
            let hardware = *devices.hardware_info();
            let info = DeviceInfo {
                hardware_version: hardware.version,
                software_version: SOFTWARE_VERSION,
                memory_size: hardware.memory_size,
                valid_records: devices.count_valid(),
            };
            Outcome::Reply(Reply::Info(info))
        }
        Request::SetInfo(bytes) => match HardwareInfo::from_request(&bytes) {
            // New capacity only applies after a reset
            Ok(info) => match devices.write_hardware_info(&info) {
                Ok(()) => Outcome::Halt,
                // Keep running so the host can retry
                Err(_) => Outcome::Reply(Reply::Error),
            },
            Err(_) => Outcome::Silent,
        },
        Request::Verbose => {
            timer.set_verbose(true);
            Outcome::Reply(Reply::VerboseOn)
        }
        Request::Halt => Outcome::Halt,
    }
}
