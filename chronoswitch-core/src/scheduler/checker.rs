//! Minute-interval checker
//!
//! Records are stored in non-decreasing time-of-day order and form a valid
//! prefix of the store. The scheduler keeps a cursor into that prefix and,
//! for each interval of minutes that passed, fires records from the cursor
//! onwards until one falls outside the interval. The cursor wraps to slot 0
//! at the end of the prefix, so the schedule repeats daily.
//!
//! When midnight passes between two checks, the minutes before midnight
//! and after it are scanned as two intervals. Both are matched against the
//! date read after midnight.

use core::ops::Range;

use heapless::Vec;

use crate::action::ActionRecord;
use crate::time::{Datetime, MINUTES_PER_DAY};
use crate::traits::SignalTransmitter;

use super::source::ScheduleSource;

/// How due records are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CheckMode {
    /// Advance the cursor past due records without transmitting
    Init,
    /// Transmit due records
    Normal,
}

/// Due actions listed in a [`CheckReport`]; further ones are only counted
pub const MAX_REPORTED_ACTIONS: usize = 8;

/// A record that matched during a check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DueAction {
    /// Store slot of the record
    pub index: u16,
    pub record: ActionRecord,
    /// Whether the command was transmitted
    pub fired: bool,
}

/// Summary of one check
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CheckReport {
    /// Clock reading the check ran against
    pub now: Datetime,
    /// Intervals scanned (0 if no minute passed, 2 across midnight)
    pub intervals: u8,
    /// Record reads that succeeded
    pub examined: u16,
    /// Records that matched the day
    pub due: u16,
    /// Commands transmitted
    pub fired: u16,
    /// The first due records, in firing order
    pub actions: Vec<DueAction, MAX_REPORTED_ACTIONS>,
}

/// Scheduler cursor state
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    last_checked_minute: u16,
    next_scan_index: u16,
}

impl Scheduler {
    pub const fn new() -> Self {
        Self {
            last_checked_minute: 0,
            next_scan_index: 0,
        }
    }

    /// Minute of the day of the last successful check
    pub fn last_checked_minute(&self) -> u16 {
        self.last_checked_minute
    }

    /// Slot the next scan starts at
    pub fn next_scan_index(&self) -> u16 {
        self.next_scan_index
    }

    /// Handle the minutes elapsed since the last check
    ///
    /// Returns `None`, leaving all state untouched, if the clock cannot be
    /// read. Record read failures end the current interval early and are
    /// not reported.
    pub fn check_due<S, X>(
        &mut self,
        source: &mut S,
        transmitter: &mut X,
        mode: CheckMode,
    ) -> Option<CheckReport>
    where
        S: ScheduleSource,
        X: SignalTransmitter,
    {
        let now = source.now().ok()?;
        let current = now.minute_of_day();
        let mut report = CheckReport {
            now,
            intervals: 0,
            examined: 0,
            due: 0,
            fired: 0,
            actions: Vec::new(),
        };

        if current == self.last_checked_minute {
            return Some(report);
        }

        let last = self.last_checked_minute;
        if current > last {
            self.scan(source, transmitter, mode, last..current, &mut report);
        } else {
            self.scan(source, transmitter, mode, last..MINUTES_PER_DAY, &mut report);
            self.scan(source, transmitter, mode, 0..current, &mut report);
        }
        self.last_checked_minute = current;

        Some(report)
    }

    /// Fire records due within `window` starting at the cursor
    fn scan<S, X>(
        &mut self,
        source: &mut S,
        transmitter: &mut X,
        mode: CheckMode,
        window: Range<u16>,
        report: &mut CheckReport,
    ) where
        S: ScheduleSource,
        X: SignalTransmitter,
    {
        report.intervals += 1;

        let capacity = source.capacity();
        if capacity == 0 {
            return;
        }
        if self.next_scan_index >= capacity {
            self.next_scan_index = 0;
        }
        let first = self.next_scan_index;

        loop {
            let Ok(record) = source.record(self.next_scan_index) else {
                break;
            };
            report.examined += 1;

            if !record.valid {
                if self.next_scan_index == 0 {
                    // Empty store
                    break;
                }
                self.next_scan_index = 0;
            } else {
                if !window.contains(&record.minute_of_day()) {
                    break;
                }
                if record.matches_day(&report.now) {
                    report.due += 1;
                    let fired = mode == CheckMode::Normal && Self::fire(transmitter, &record);
                    if fired {
                        report.fired += 1;
                    }
                    // Overflow only shortens the trace
                    let _ = report.actions.push(DueAction {
                        index: self.next_scan_index,
                        record,
                        fired,
                    });
                }
                self.next_scan_index = (self.next_scan_index + 1) % capacity;
            }

            if self.next_scan_index == first {
                break;
            }
        }
    }

    /// Transmit a due record; returns whether anything was sent
    fn fire<X: SignalTransmitter>(transmitter: &mut X, record: &ActionRecord) -> bool {
        // Out-of-range unit ids cannot be encoded; skip them
        match record.unit() {
            Some(unit) => {
                transmitter.transmit(unit, record.command);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{Command, UnitAddress};
    use std::vec::Vec;

    struct FakeSource {
        now: Option<Datetime>,
        records: Vec<ActionRecord>,
        capacity: u16,
        /// Record reads at or beyond this slot fail
        fail_from: Option<u16>,
        reads: Vec<u16>,
    }

    impl FakeSource {
        fn new(capacity: u16, records: &[ActionRecord]) -> Self {
            Self {
                now: None,
                records: records.to_vec(),
                capacity,
                fail_from: None,
                reads: Vec::new(),
            }
        }

        fn at(&mut self, hours: u8, minutes: u8) -> &mut Self {
            self.now = Some(Datetime {
                hours,
                minutes,
                ..monday()
            });
            self
        }
    }

    impl ScheduleSource for FakeSource {
        type Error = ();

        fn now(&mut self) -> Result<Datetime, ()> {
            self.now.ok_or(())
        }

        fn capacity(&self) -> u16 {
            self.capacity
        }

        fn record(&mut self, index: u16) -> Result<ActionRecord, ()> {
            self.reads.push(index);
            if self.fail_from.is_some_and(|from| index >= from) {
                return Err(());
            }
            Ok(self
                .records
                .get(index as usize)
                .copied()
                .unwrap_or(ActionRecord::INVALID))
        }
    }

    #[derive(Default)]
    struct Recorder {
        sent: Vec<(u8, u8, Command)>,
    }

    impl SignalTransmitter for Recorder {
        fn transmit(&mut self, unit: UnitAddress, command: Command) {
            self.sent.push((unit.major(), unit.minor(), command));
        }
    }

    fn monday() -> Datetime {
        Datetime {
            seconds: 0,
            minutes: 0,
            hours: 0,
            weekday: 1,
            day: 17,
            month: 6,
            year: 24,
        }
    }

    fn action(minor: u8, hours: u8, minutes: u8) -> ActionRecord {
        ActionRecord {
            valid: true,
            major: b'A',
            minor,
            hours,
            minutes,
            command: Command::On,
            ..ActionRecord::INVALID
        }
    }

    /// Check at every minute from `start` to `end` inclusive
    fn run_minutes(
        sched: &mut Scheduler,
        source: &mut FakeSource,
        tx: &mut Recorder,
        start: u16,
        end: u16,
    ) {
        for minute in start..=end {
            source.at((minute / 60) as u8, (minute % 60) as u8);
            sched.check_due(source, tx, CheckMode::Normal);
        }
    }

    #[test]
    fn test_nine_oclock_fires_once() {
        let mut source = FakeSource::new(819, &[action(1, 9, 0)]);
        let mut tx = Recorder::default();
        let mut sched = Scheduler::new();

        source.at(8, 0);
        sched.check_due(&mut source, &mut tx, CheckMode::Init);

        run_minutes(&mut sched, &mut source, &mut tx, 8 * 60 + 1, 9 * 60);
        // 09:00 itself is the open end of the interval
        assert!(tx.sent.is_empty());

        run_minutes(&mut sched, &mut source, &mut tx, 9 * 60 + 1, 9 * 60 + 1);
        assert_eq!(tx.sent, [(b'A', 1, Command::On)]);

        run_minutes(&mut sched, &mut source, &mut tx, 9 * 60 + 2, 23 * 60 + 59);
        assert_eq!(tx.sent.len(), 1);
    }

    #[test]
    fn test_fires_on_every_weekday() {
        for weekday in 1..=7 {
            let mut source = FakeSource::new(819, &[action(1, 9, 0)]);
            let mut tx = Recorder::default();
            let mut sched = Scheduler::new();

            source.at(8, 59);
            source.now.as_mut().unwrap().weekday = weekday;
            sched.check_due(&mut source, &mut tx, CheckMode::Init);
            source.at(9, 1);
            source.now.as_mut().unwrap().weekday = weekday;
            sched.check_due(&mut source, &mut tx, CheckMode::Normal);

            assert_eq!(tx.sent.len(), 1, "weekday {}", weekday);
        }
    }

    #[test]
    fn test_same_minute_is_noop() {
        let mut source = FakeSource::new(819, &[action(1, 0, 0)]);
        let mut tx = Recorder::default();
        let mut sched = Scheduler::new();

        source.at(0, 0);
        let report = sched.check_due(&mut source, &mut tx, CheckMode::Normal).unwrap();
        assert_eq!(report.intervals, 0);
        assert!(source.reads.is_empty());
    }

    #[test]
    fn test_midnight_wrap_order() {
        let records = [action(1, 0, 5), action(2, 23, 55)];
        let mut source = FakeSource::new(819, &records);
        let mut tx = Recorder::default();
        let mut sched = Scheduler::new();

        // Cursor sits on the 23:55 record at 23:50
        source.at(23, 50);
        sched.check_due(&mut source, &mut tx, CheckMode::Init);
        assert_eq!(sched.last_checked_minute(), 1430);
        assert_eq!(sched.next_scan_index(), 1);

        source.at(0, 10);
        let report = sched.check_due(&mut source, &mut tx, CheckMode::Normal).unwrap();
        assert_eq!(report.intervals, 2);
        assert_eq!(tx.sent, [(b'A', 2, Command::On), (b'A', 1, Command::On)]);
        assert_eq!(sched.last_checked_minute(), 10);
        assert_eq!(sched.next_scan_index(), 1);
    }

    #[test]
    fn test_wrapped_interval_uses_new_date() {
        // Current behaviour: a dated 23:55 action is matched against the
        // date read after midnight, so it does not fire on its own date.
        let mut dated = action(1, 23, 55);
        dated.day = 17;
        dated.month = 6;
        dated.year = 24;
        let mut source = FakeSource::new(819, &[dated]);
        let mut tx = Recorder::default();
        let mut sched = Scheduler::new();

        source.at(23, 50);
        sched.check_due(&mut source, &mut tx, CheckMode::Init);

        source.at(0, 1);
        source.now.as_mut().unwrap().day = 18;
        source.now.as_mut().unwrap().weekday = 2;
        let report = sched.check_due(&mut source, &mut tx, CheckMode::Normal).unwrap();
        assert_eq!(report.due, 0);
        assert!(tx.sent.is_empty());
    }

    #[test]
    fn test_init_advances_without_firing() {
        let records = [action(1, 6, 0), action(2, 7, 0), action(3, 12, 0)];
        let mut source = FakeSource::new(819, &records);
        let mut tx = Recorder::default();
        let mut sched = Scheduler::new();

        source.at(10, 30);
        let report = sched.check_due(&mut source, &mut tx, CheckMode::Init).unwrap();
        assert!(tx.sent.is_empty());
        assert_eq!(report.due, 2);
        assert_eq!(report.fired, 0);
        assert_eq!(sched.last_checked_minute(), 630);
        assert_eq!(sched.next_scan_index(), 2);

        source.at(12, 1);
        sched.check_due(&mut source, &mut tx, CheckMode::Normal);
        assert_eq!(tx.sent, [(b'A', 3, Command::On)]);
    }

    #[test]
    fn test_clock_failure_skips_tick() {
        let mut source = FakeSource::new(819, &[action(1, 9, 0)]);
        let mut tx = Recorder::default();
        let mut sched = Scheduler::new();

        source.at(9, 30);
        sched.check_due(&mut source, &mut tx, CheckMode::Init);

        let before = sched.clone();
        source.now = None;
        assert_eq!(sched.check_due(&mut source, &mut tx, CheckMode::Normal), None);
        assert_eq!(sched.last_checked_minute(), 570);
        assert_eq!(sched.next_scan_index(), before.next_scan_index());
    }

    #[test]
    fn test_empty_store() {
        let mut source = FakeSource::new(819, &[]);
        let mut tx = Recorder::default();
        let mut sched = Scheduler::new();

        source.at(12, 0);
        let report = sched.check_due(&mut source, &mut tx, CheckMode::Normal).unwrap();
        assert_eq!(source.reads, [0]);
        assert_eq!(report.examined, 1);
        assert_eq!(sched.next_scan_index(), 0);
        assert_eq!(sched.last_checked_minute(), 720);
    }

    #[test]
    fn test_zero_capacity_reads_nothing() {
        let mut source = FakeSource::new(0, &[action(1, 0, 0)]);
        let mut tx = Recorder::default();
        let mut sched = Scheduler::new();

        source.at(12, 0);
        sched.check_due(&mut source, &mut tx, CheckMode::Normal);
        assert!(source.reads.is_empty());
    }

    #[test]
    fn test_single_record_does_not_loop() {
        let mut source = FakeSource::new(1, &[action(1, 0, 0)]);
        let mut tx = Recorder::default();
        let mut sched = Scheduler::new();

        source.at(0, 1);
        sched.check_due(&mut source, &mut tx, CheckMode::Normal);
        assert_eq!(tx.sent.len(), 1);
        assert_eq!(source.reads, [0]);
    }

    #[test]
    fn test_full_store_fires_each_once() {
        let records = [action(1, 1, 0), action(2, 2, 0), action(3, 3, 0)];
        let mut source = FakeSource::new(3, &records);
        let mut tx = Recorder::default();
        let mut sched = Scheduler::new();

        source.at(4, 0);
        sched.check_due(&mut source, &mut tx, CheckMode::Normal);
        assert_eq!(tx.sent.len(), 3);
        assert_eq!(sched.next_scan_index(), 0);
    }

    #[test]
    fn test_wraps_at_end_of_prefix() {
        let records = [action(1, 8, 0), action(2, 20, 0)];
        let mut source = FakeSource::new(819, &records);
        let mut tx = Recorder::default();
        let mut sched = Scheduler::new();

        source.at(12, 0);
        sched.check_due(&mut source, &mut tx, CheckMode::Init);
        assert_eq!(sched.next_scan_index(), 1);

        // Slot 2 is invalid, so the scan wraps to slot 0 and stops there
        source.at(21, 0);
        sched.check_due(&mut source, &mut tx, CheckMode::Normal);
        assert_eq!(tx.sent, [(b'A', 2, Command::On)]);
        assert_eq!(sched.next_scan_index(), 0);
        tx.sent.clear();

        source.at(8, 1);
        sched.check_due(&mut source, &mut tx, CheckMode::Normal);
        assert_eq!(tx.sent, [(b'A', 1, Command::On)]);
        assert_eq!(sched.next_scan_index(), 1);
    }

    #[test]
    fn test_read_failure_truncates_scan() {
        let records = [action(1, 1, 0), action(2, 2, 0), action(3, 3, 0)];
        let mut source = FakeSource::new(819, &records);
        source.fail_from = Some(1);
        let mut tx = Recorder::default();
        let mut sched = Scheduler::new();

        source.at(4, 0);
        sched.check_due(&mut source, &mut tx, CheckMode::Normal);
        assert_eq!(tx.sent.len(), 1);
        assert_eq!(sched.next_scan_index(), 1);
        assert_eq!(sched.last_checked_minute(), 240);
    }

    #[test]
    fn test_weekday_mismatch_advances_cursor() {
        let mut tuesday_only = action(1, 9, 0);
        tuesday_only.weekday = 2;
        let mut source = FakeSource::new(819, &[tuesday_only, action(2, 9, 30)]);
        let mut tx = Recorder::default();
        let mut sched = Scheduler::new();

        source.at(8, 0);
        sched.check_due(&mut source, &mut tx, CheckMode::Init);
        source.at(10, 0);
        sched.check_due(&mut source, &mut tx, CheckMode::Normal);
        assert_eq!(tx.sent, [(b'A', 2, Command::On)]);
        assert_eq!(sched.next_scan_index(), 0);
    }

    #[test]
    fn test_bad_unit_id_not_transmitted() {
        let mut bad = action(1, 9, 0);
        bad.major = b'Z';
        let mut source = FakeSource::new(819, &[bad, action(2, 9, 0)]);
        let mut tx = Recorder::default();
        let mut sched = Scheduler::new();

        source.at(8, 0);
        sched.check_due(&mut source, &mut tx, CheckMode::Init);
        source.at(9, 1);
        let report = sched.check_due(&mut source, &mut tx, CheckMode::Normal).unwrap();
        assert_eq!(report.due, 2);
        assert_eq!(report.fired, 1);
        assert_eq!(tx.sent, [(b'A', 2, Command::On)]);

        let listed: Vec<(u16, bool)> = report.actions.iter().map(|a| (a.index, a.fired)).collect();
        assert_eq!(listed.as_slice(), &[(0, false), (1, true)]);
    }

    #[test]
    fn test_report_lists_due_actions() {
        let mut source = FakeSource::new(819, &[action(1, 9, 0), action(2, 9, 0)]);
        let mut tx = Recorder::default();
        let mut sched = Scheduler::new();

        source.at(8, 0);
        sched.check_due(&mut source, &mut tx, CheckMode::Init);
        source.at(9, 1);
        let report = sched.check_due(&mut source, &mut tx, CheckMode::Normal).unwrap();

        assert_eq!(report.actions.len(), 2);
        assert_eq!(report.actions[0].index, 0);
        assert_eq!(report.actions[0].record.minor, 1);
        assert!(report.actions[0].fired);
        assert_eq!(report.actions[1].index, 1);
        assert_eq!(report.actions[1].record.minor, 2);
    }

    #[test]
    fn test_init_lists_skipped_actions() {
        let mut source = FakeSource::new(819, &[action(1, 7, 0)]);
        let mut tx = Recorder::default();
        let mut sched = Scheduler::new();

        source.at(8, 0);
        let report = sched.check_due(&mut source, &mut tx, CheckMode::Init).unwrap();
        assert_eq!(report.actions.len(), 1);
        assert!(!report.actions[0].fired);
        assert!(tx.sent.is_empty());
    }

    #[test]
    fn test_report_action_list_is_bounded() {
        let records: Vec<ActionRecord> = (1..=12).map(|minor| action(minor, 9, 0)).collect();
        let mut source = FakeSource::new(819, &records);
        let mut tx = Recorder::default();
        let mut sched = Scheduler::new();

        source.at(8, 0);
        sched.check_due(&mut source, &mut tx, CheckMode::Init);
        source.at(9, 1);
        let report = sched.check_due(&mut source, &mut tx, CheckMode::Normal).unwrap();

        assert_eq!(report.fired, 12);
        assert_eq!(report.actions.len(), MAX_REPORTED_ACTIONS);
        assert_eq!(tx.sent.len(), 12);
    }
}
