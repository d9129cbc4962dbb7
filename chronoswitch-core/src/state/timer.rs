//! Timer enable state
//!
//! A host can pause the schedule while it edits records. The pause is
//! bounded: after a fixed number of minute ticks the timer re-enables
//! itself, so a host that disconnects mid-edit cannot leave the device
//! switched off for good.
//!
//! A minute tick that arrives while the timer is disabled stays pending and
//! is handled as soon as the timer is enabled again.

/// Timer enable flag, auto re-enable countdown and verbose tracing flag
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerState {
    enabled: bool,
    verbose: bool,
    tick_pending: bool,
    /// Ticks to wait before re-enabling
    disable_timeout: u8,
    remaining: u8,
}

impl TimerState {
    /// Create an enabled timer
    pub const fn new(disable_timeout: u8) -> Self {
        Self {
            enabled: true,
            verbose: false,
            tick_pending: false,
            disable_timeout,
            remaining: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Pause the schedule and arm the re-enable countdown
    ///
    /// Also turns verbose tracing off.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.remaining = self.disable_timeout;
        self.verbose = false;
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Record a minute tick and run the re-enable countdown
    pub fn on_minute_tick(&mut self) {
        self.tick_pending = true;
        if !self.enabled {
            if self.remaining == 0 {
                self.enabled = true;
            } else {
                self.remaining -= 1;
            }
        }
    }

    /// Whether the scheduler should run now
    ///
    /// Consumes the pending tick if the timer is enabled.
    pub fn take_due(&mut self) -> bool {
        if self.enabled && self.tick_pending {
            self.tick_pending = false;
            true
        } else {
            false
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_runs_each_tick() {
        let mut timer = TimerState::default();
        assert!(!timer.take_due());
        timer.on_minute_tick();
        assert!(timer.take_due());
        assert!(!timer.take_due());
    }

    #[test]
    fn test_ticks_coalesce() {
        let mut timer = TimerState::default();
        timer.on_minute_tick();
        timer.on_minute_tick();
        assert!(timer.take_due());
        assert!(!timer.take_due());
    }

    #[test]
    fn test_auto_reenable() {
        let mut timer = TimerState::new(10);
        timer.disable();

        for _ in 0..10 {
            timer.on_minute_tick();
            assert!(!timer.is_enabled());
            assert!(!timer.take_due());
        }
        // The eleventh tick re-enables and runs
        timer.on_minute_tick();
        assert!(timer.is_enabled());
        assert!(timer.take_due());
    }

    #[test]
    fn test_disable_clears_verbose() {
        let mut timer = TimerState::default();
        timer.set_verbose(true);
        assert!(timer.is_verbose());
        timer.disable();
        assert!(!timer.is_verbose());
    }

    #[test]
    fn test_pending_tick_runs_on_enable() {
        let mut timer = TimerState::default();
        timer.disable();
        timer.on_minute_tick();
        assert!(!timer.take_due());

        timer.enable();
        assert!(timer.take_due());
    }

    #[test]
    fn test_disable_rearms_countdown() {
        let mut timer = TimerState::new(2);
        timer.disable();
        timer.on_minute_tick();
        timer.on_minute_tick();
        timer.disable();
        timer.on_minute_tick();
        assert!(!timer.is_enabled());
    }
}
