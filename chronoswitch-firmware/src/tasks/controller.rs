//! Main controller task
//!
//! Owns the two-wire bus, the scheduler cursor, the timer state and the
//! radio transmitter. Waits for either a scheduler tick or a host request
//! and handles each to completion before taking the next one.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_rp::uart::BufferedUartTx;
use embassy_time::Delay;
use embedded_io_async::Write;

use chronoswitch_core::command::{execute, format_action, format_check, Outcome};
use chronoswitch_core::device::Devices;
use chronoswitch_core::scheduler::{CheckMode, Scheduler};
use chronoswitch_core::state::TimerState;
use chronoswitch_drivers::remote::Pt2262Transmitter;
use chronoswitch_hal_rp2040::BitBangTwi;
use chronoswitch_protocol::{ParseError, Request, REPLY_ERROR};

use crate::channels::{MINUTE_TICK, REQUEST_CHANNEL};

/// Bus controller wired to the clock and the EEPROM
pub type Bus = BitBangTwi<'static>;

/// Radio transmitter for the remote-controlled sockets
pub type Transmitter = Pt2262Transmitter<Output<'static>, Output<'static>, Delay>;

/// Everything the controller task owns
pub struct Controller {
    devices: Devices<Bus>,
    scheduler: Scheduler,
    timer: TimerState,
    transmitter: Transmitter,
    tx: BufferedUartTx,
}

impl Controller {
    pub fn new(
        devices: Devices<Bus>,
        timer: TimerState,
        transmitter: Transmitter,
        tx: BufferedUartTx,
    ) -> Self {
        Self {
            devices,
            scheduler: Scheduler::new(),
            timer,
            transmitter,
            tx,
        }
    }

    /// Size the action store and skip everything already due today
    async fn boot(&mut self) {
        match self.devices.load_hardware_info() {
            Ok(info) => info!(
                "Hardware v{}, {} byte memory, {} action slots",
                info.version,
                info.memory_size,
                info.action_capacity()
            ),
            Err(e) => warn!("Hardware info unreadable, schedule disabled: {:?}", e),
        }

        self.run_check(CheckMode::Init).await;
    }

    async fn on_tick(&mut self) {
        self.timer.on_minute_tick();
        if self.timer.take_due() {
            self.run_check(CheckMode::Normal).await;
        } else {
            debug!("Tick while timer disabled");
        }
    }

    /// Handle one host request
    ///
    /// Returns `false` once the host asked the device to halt.
    async fn on_request(&mut self, request: Result<Request, ParseError>) -> bool {
        let request = match request {
            Ok(request) => request,
            Err(_) => {
                self.send(&[REPLY_ERROR]).await;
                return true;
            }
        };

        match execute(
            &request,
            &mut self.devices,
            &mut self.timer,
            &mut self.transmitter,
        ) {
            Outcome::Reply(reply) => self.send(&reply.encode()).await,
            Outcome::Silent => debug!("No reply for {:?}", request),
            Outcome::Halt => return false,
        }

        // Re-enabling the timer releases a tick held while it was paused
        if self.timer.take_due() {
            self.run_check(CheckMode::Normal).await;
        }
        true
    }

    async fn run_check(&mut self, mode: CheckMode) {
        let Some(report) = self
            .scheduler
            .check_due(&mut self.devices, &mut self.transmitter, mode)
        else {
            warn!("Clock unreadable, check skipped");
            return;
        };

        debug!(
            "Check {:?}: {} intervals, {} examined, {} due, {} fired, next slot {}",
            mode,
            report.intervals,
            report.examined,
            report.due,
            report.fired,
            self.scheduler.next_scan_index()
        );

        if self.timer.is_verbose() {
            let line = format_check(mode, &report);
            self.send(line.as_bytes()).await;
            for action in &report.actions {
                let line = format_action(mode, action);
                self.send(line.as_bytes()).await;
            }
        }
    }

    async fn send(&mut self, bytes: &[u8]) {
        if let Err(e) = self.tx.write_all(bytes).await {
            warn!("UART write error: {:?}", e);
        }
    }
}

/// Controller task - main coordination loop
#[embassy_executor::task]
pub async fn controller_task(mut controller: Controller) {
    info!("Controller task started");

    controller.boot().await;

    loop {
        match select(MINUTE_TICK.wait(), REQUEST_CHANNEL.receive()).await {
            Either::First(()) => controller.on_tick().await,
            Either::Second(request) => {
                if !controller.on_request(request).await {
                    break;
                }
            }
        }
    }

    info!("Halted, waiting for reset");
    core::future::pending::<()>().await;
}
