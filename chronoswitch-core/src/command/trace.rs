//! Verbose trace lines
//!
//! While verbose mode is on the firmware writes one summary line per
//! scheduler check, followed by one line per due action, to the serial port
//! interleaved with replies. Hosts only enable it from a terminal.

use core::fmt::Write;

use heapless::String;

use crate::scheduler::{CheckMode, CheckReport, DueAction};
use crate::traits::Command;

/// Longest trace line
pub const TRACE_LINE_SIZE: usize = 128;

pub type TraceLine = String<TRACE_LINE_SIZE>;

/// Describe one scheduler check
pub fn format_check(mode: CheckMode, report: &CheckReport) -> TraceLine {
    let mut line = TraceLine::new();
    let now = &report.now;
    let verb = match mode {
        CheckMode::Init => "initialised",
        CheckMode::Normal => "checked",
    };
    // Longest possible line is well under TRACE_LINE_SIZE
    let _ = write!(
        line,
        "{} actions on {:02}-{:02}-{:02} ({}) {:02}:{:02}:{:02} minute={} intervals={} examined={} due={} fired={}\r\n",
        verb,
        now.day,
        now.month,
        now.year,
        now.weekday,
        now.hours,
        now.minutes,
        now.seconds,
        now.minute_of_day(),
        report.intervals,
        report.examined,
        report.due,
        report.fired,
    );
    line
}

/// Describe one due action of a check
pub fn format_action(mode: CheckMode, action: &DueAction) -> TraceLine {
    let mut line = TraceLine::new();
    let record = &action.record;
    let outcome = if action.fired {
        "fired"
    } else if mode == CheckMode::Init {
        "skipped"
    } else {
        "bad unit"
    };
    let unit = if record.major.is_ascii_uppercase() {
        record.major as char
    } else {
        '?'
    };
    let command = match record.command {
        Command::On => "on",
        Command::Off => "off",
    };
    let _ = write!(
        line,
        "  slot {} at {:02}:{:02} unit {}{} {} {}\r\n",
        action.index,
        record.hours,
        record.minutes,
        unit,
        record.minor,
        command,
        outcome,
    );
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionRecord;
    use crate::time::Datetime;

    #[test]
    fn test_check_line() {
        let report = CheckReport {
            now: Datetime {
                seconds: 4,
                minutes: 1,
                hours: 9,
                weekday: 1,
                day: 17,
                month: 6,
                year: 24,
            },
            intervals: 1,
            examined: 2,
            due: 1,
            fired: 1,
            actions: Default::default(),
        };
        assert_eq!(
            format_check(CheckMode::Normal, &report).as_str(),
            "checked actions on 17-06-24 (1) 09:01:04 minute=541 intervals=1 examined=2 due=1 fired=1\r\n"
        );
    }

    #[test]
    fn test_longest_line_fits() {
        let report = CheckReport {
            now: Datetime {
                seconds: 59,
                minutes: 59,
                hours: 23,
                weekday: 7,
                day: 31,
                month: 12,
                year: 99,
            },
            intervals: 2,
            examined: u16::MAX,
            due: u16::MAX,
            fired: u16::MAX,
            actions: Default::default(),
        };
        let line = format_check(CheckMode::Init, &report);
        assert!(line.ends_with("\r\n"));
    }

    fn due(major: u8, command: Command, fired: bool) -> DueAction {
        DueAction {
            index: 12,
            record: ActionRecord {
                valid: true,
                major,
                minor: 3,
                hours: 7,
                minutes: 5,
                command,
                ..ActionRecord::INVALID
            },
            fired,
        }
    }

    #[test]
    fn test_action_lines() {
        assert_eq!(
            format_action(CheckMode::Normal, &due(b'B', Command::On, true)).as_str(),
            "  slot 12 at 07:05 unit B3 on fired\r\n"
        );
        assert_eq!(
            format_action(CheckMode::Init, &due(b'B', Command::Off, false)).as_str(),
            "  slot 12 at 07:05 unit B3 off skipped\r\n"
        );
        assert_eq!(
            format_action(CheckMode::Normal, &due(b'z', Command::On, false)).as_str(),
            "  slot 12 at 07:05 unit ?3 on bad unit\r\n"
        );
    }
}
