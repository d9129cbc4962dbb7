//! PT2262 encoder emulation
//!
//! Drives a 433 MHz transmitter module with the code words of a PT2262
//! remote-control encoder. Each code word is 12 tri-state bits ("trits")
//! followed by a sync bit:
//!
//! | Trits | Content                                       |
//! |-------|-----------------------------------------------|
//! | 0-3   | major id (`'A'` = 0), LSB first               |
//! | 4-7   | minor id (1 = 0), LSB first                   |
//! | 8     | Low                                           |
//! | 9-10  | Float                                         |
//! | 11    | Float for on, Low for off                     |
//!
//! An address bit of 1 is sent as Float, 0 as Low.
//!
//! Every trit lasts 16 pulse units `T`, the sync bit 32:
//! ```text
//! Low    ▔|___|▔|___      T hi, 3T lo, T hi, 3T lo
//! High   ▔▔▔|_|▔▔▔|_      3T hi, T lo, 3T hi, T lo
//! Float  ▔|___|▔▔▔|_      T hi, 3T lo, 3T hi, T lo
//! Sync   ▔|_______...     T hi, 31T lo
//! ```

use chronoswitch_core::traits::{Command, SignalTransmitter, UnitAddress};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Trits per code word
pub const CODE_WORD_LEN: usize = 12;

/// PT2262 tri-state code bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trit {
    Low,
    High,
    Float,
}

impl Trit {
    /// Pulse pattern as (high units, low units) pairs
    fn pulses(self) -> [(u32, u32); 2] {
        match self {
            Trit::Low => [(1, 3), (1, 3)],
            Trit::High => [(3, 1), (3, 1)],
            Trit::Float => [(1, 3), (3, 1)],
        }
    }
}

/// Sync bit as (high units, low units)
const SYNC: (u32, u32) = (1, 31);

/// Build the code word for a unit and command
pub fn code_word(unit: UnitAddress, command: Command) -> [Trit; CODE_WORD_LEN] {
    let address_trit = |value: u8, bit: usize| {
        if value >> bit & 0x01 != 0 {
            Trit::Float
        } else {
            Trit::Low
        }
    };

    let mut word = [Trit::Low; CODE_WORD_LEN];
    for bit in 0..4 {
        word[bit] = address_trit(unit.major_index(), bit);
        word[4 + bit] = address_trit(unit.minor_index(), bit);
    }
    word[8] = Trit::Low;
    word[9] = Trit::Float;
    word[10] = Trit::Float;
    word[11] = match command {
        Command::On => Trit::Float,
        Command::Off => Trit::Low,
    };
    word
}

/// Transmitter timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pt2262Config {
    /// Pulse unit `T` in microseconds
    pub pulse_unit_us: u32,
    /// Code words per frame
    pub repeats: u8,
    /// Delay between powering the module and the first pulse
    pub warmup_us: u32,
}

impl Default for Pt2262Config {
    fn default() -> Self {
        Self {
            pulse_unit_us: 375,
            repeats: 4,
            warmup_us: 2_000,
        }
    }
}

/// PT2262 transmitter on a data pin and a module power pin
///
/// Timing is produced with blocking delays, so the caller is stalled for
/// the whole frame (about 340 ms with the default timing).
pub struct Pt2262Transmitter<P, E, D> {
    data: P,
    power: E,
    delay: D,
    config: Pt2262Config,
}

impl<P, E, D> Pt2262Transmitter<P, E, D>
where
    P: OutputPin,
    E: OutputPin,
    D: DelayNs,
{
    /// Create a transmitter with both pins driven low
    pub fn new(data: P, power: E, delay: D, config: Pt2262Config) -> Self {
        let mut tx = Self {
            data,
            power,
            delay,
            config,
        };
        let _ = tx.data.set_low();
        let _ = tx.power.set_low();
        tx
    }

    /// Power the module, send the word `repeats` times, power down
    pub fn send_frame(&mut self, word: &[Trit; CODE_WORD_LEN]) {
        let _ = self.power.set_high();
        self.delay.delay_us(self.config.warmup_us);

        for _ in 0..self.config.repeats {
            for trit in word {
                for (high, low) in trit.pulses() {
                    self.pulse(high, low);
                }
            }
            self.pulse(SYNC.0, SYNC.1);
        }

        let _ = self.power.set_low();
    }

    fn pulse(&mut self, high_units: u32, low_units: u32) {
        let unit = self.config.pulse_unit_us;
        // Pin errors cannot be reported from a fire-and-forget transmission
        let _ = self.data.set_high();
        self.delay.delay_us(high_units * unit);
        let _ = self.data.set_low();
        self.delay.delay_us(low_units * unit);
    }
}

impl<P, E, D> SignalTransmitter for Pt2262Transmitter<P, E, D>
where
    P: OutputPin,
    E: OutputPin,
    D: DelayNs,
{
    fn transmit(&mut self, unit: UnitAddress, command: Command) {
        let word = code_word(unit, command);
        self.send_frame(&word);
    }
}
