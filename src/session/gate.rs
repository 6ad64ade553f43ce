use std::time::{Duration, Instant};

/// Minimum pause before the first card is shown. Opens once the delay has
/// passed or the learner skips it.
#[derive(Clone, Copy, Debug)]
pub struct LoadingGate {
    started: Instant,
    min_delay: Duration,
    skipped: bool,
}

impl LoadingGate {
    pub fn new(now: Instant, min_delay: Duration) -> Self {
        Self {
            started: now,
            min_delay,
            skipped: false,
        }
    }

    pub fn skip(&mut self) {
        self.skipped = true;
    }

    pub fn is_open(&self, now: Instant) -> bool {
        self.skipped || now.saturating_duration_since(self.started) >= self.min_delay
    }

    /// Fraction of the delay elapsed, for the loading indicator.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.is_open(now) || self.min_delay.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.min_delay.as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// Holds off new card input while the previous transition is still settling.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputGate {
    locked_until: Option<Instant>,
}

impl InputGate {
    pub fn lock_for(&mut self, now: Instant, duration: Duration) {
        self.locked_until = if duration.is_zero() {
            None
        } else {
            Some(now + duration)
        };
    }

    pub fn is_locked(&self, now: Instant) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }

    pub fn release(&mut self) {
        self.locked_until = None;
    }
}
