//! Chronoswitch - Socket Timer Firmware
//!
//! Main firmware binary for RP2040-based socket timers. Reads the date and
//! time from a DS1307 clock, keeps the weekly switching schedule in a
//! 24C65 EEPROM on the same two-wire bus, and switches remote-controlled
//! sockets through a PT2262 radio transmitter. A host edits the schedule
//! over the serial link.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Flex, Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use chronoswitch_core::bus::TwiBus;
use chronoswitch_core::device::Devices;
use chronoswitch_core::state::TimerState;
use chronoswitch_drivers::remote::{Pt2262Config, Pt2262Transmitter};
use chronoswitch_hal_rp2040::{BitBangTwi, TwiConfig};

use crate::config::BOARD;
use crate::tasks::Controller;

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Chronoswitch firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Host serial link
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = BOARD.baud_rate;

    let tx_buf = TX_BUF.init([0u8; 128]);
    let rx_buf = RX_BUF.init([0u8; 64]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized at {} baud", BOARD.baud_rate);

    // Two-wire bus shared by the clock and the EEPROM
    // Pin assignment is board-specific (SDA=GPIO4, SCL=GPIO5, external pull-ups)
    let twi = BitBangTwi::new(
        Flex::new(p.PIN_5),
        Flex::new(p.PIN_4),
        TwiConfig {
            frequency: BOARD.bus_frequency_hz,
        },
    );
    let devices = Devices::new(TwiBus::new(twi));

    info!("Two-wire bus initialized at {} Hz", BOARD.bus_frequency_hz);

    // Radio transmitter (DATA=GPIO15, module power=GPIO14)
    let transmitter = Pt2262Transmitter::new(
        Output::new(p.PIN_15, Level::Low),
        Output::new(p.PIN_14, Level::Low),
        Delay,
        Pt2262Config {
            pulse_unit_us: BOARD.pulse_unit_us,
            repeats: BOARD.transmit_repeats,
            ..Pt2262Config::default()
        },
    );

    let timer = TimerState::new(BOARD.disable_timeout_min);
    let controller = Controller::new(devices, timer, transmitter, tx);

    spawner.spawn(tasks::tick_task(BOARD.tick_period_s)).unwrap();
    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    spawner.spawn(tasks::controller_task(controller)).unwrap();

    info!("All tasks spawned, firmware running");
}
