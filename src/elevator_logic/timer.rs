//! One-shot timer, used for the door.
//!
//! The timer does not fire by itself. The control loop sleeps until [Timer::deadline] and then
//! checks [Timer::timer_timeouted].

use tokio::time::{Duration, Instant};


/// A restartable one-shot timer
#[derive(Debug, Clone)]
pub struct Timer {
    timer_active: bool,
    timeout_duration: Duration,
    start_time: Instant,
}

/// Creates a stopped timer with the given timeout
pub fn new(timeout_duration: Duration) -> Timer {
    Timer {
        timer_active: false,
        timeout_duration,
        start_time: Instant::now(),
    }
}

impl Timer {
    /// (Re)starts the timer at `now`
    pub fn timer_start(&mut self, now: Instant) {
        self.timer_active = true;
        self.start_time = now;
    }

    /// Stops the timer without firing
    pub fn timer_stop(&mut self) {
        self.timer_active = false;
    }

    /// `true` if the timer is running and has run out at `now`
    pub fn timer_timeouted(&self, now: Instant) -> bool {
        self.timer_active && now.saturating_duration_since(self.start_time) >= self.timeout_duration
    }

    /// When the running timer runs out. `None` when stopped.
    pub fn deadline(&self) -> Option<Instant> {
        self.timer_active.then(|| self.start_time + self.timeout_duration)
    }
}
