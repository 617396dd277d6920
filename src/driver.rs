use std::time::{Duration, Instant};

/// Fixed-period ticker that decides when the next `step` is due.
///
/// The driver is the only caller of `step`, so steps never overlap. It never
/// fires while paused or cancelled.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct StepDriver {
    interval: Duration,
    next_due: Option<Instant>,
    paused: bool,
}

impl StepDriver {
    /// Creates a cancelled driver.
    #[must_use]
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            next_due: None,
            paused: false,
        }
    }

    /// Starts ticking with `interval_ms`, first step one period after `now`.
    pub fn arm(&mut self, now: Instant, interval_ms: u64) {
        self.interval = Duration::from_millis(interval_ms);
        self.next_due = Some(now + self.interval);
        self.paused = false;
    }

    /// Switches to a new period after a step changed the interval.
    ///
    /// Keeps the pause flag and does nothing when cancelled.
    pub fn rearm(&mut self, now: Instant, interval_ms: u64) {
        self.interval = Duration::from_millis(interval_ms);
        if self.next_due.is_some() {
            self.next_due = Some(now + self.interval);
        }
    }

    /// Stops ticking until the next `arm`.
    pub fn cancel(&mut self) {
        self.next_due = None;
        self.paused = false;
    }

    /// Freezes ticking. Returns false when already paused or not armed.
    pub fn pause(&mut self) -> bool {
        if self.paused || self.next_due.is_none() {
            return false;
        }

        self.paused = true;
        true
    }

    /// Resumes ticking one full period after `now`. Returns false when not paused.
    pub fn resume(&mut self, now: Instant) -> bool {
        if !self.paused {
            return false;
        }

        self.paused = false;
        if self.next_due.is_some() {
            self.next_due = Some(now + self.interval);
        }
        true
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true when a step is due at `now` and schedules the next one.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.paused {
            return false;
        }

        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    /// Time left until the next step, or `None` when no step is scheduled.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        if self.paused {
            return None;
        }

        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}
