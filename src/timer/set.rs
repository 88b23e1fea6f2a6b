//! Registered set of timers ticked together.

use super::Timer;

/// The timers an agent owns, ticked once per frame in registration order.
///
/// ```rust
/// use statecraft::timer::{Timer, TimerSet};
///
/// let jump = Timer::countdown(0.5);
/// let attack = Timer::countdown(0.25);
///
/// let mut timers = TimerSet::new();
/// timers.register(&jump);
/// timers.register(&attack);
///
/// jump.start();
/// attack.start();
/// timers.tick(0.25);
///
/// assert!(jump.is_running());
/// assert!(!attack.is_running());
/// ```
#[derive(Debug, Default, Clone)]
pub struct TimerSet {
    timers: Vec<Timer>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a timer. Registering the same timer twice is ignored so that a
    /// frame never advances one clock twice.
    pub fn register(&mut self, timer: &Timer) -> &mut Self {
        if !self.timers.iter().any(|t| t.ptr_eq(timer)) {
            self.timers.push(timer.clone());
        }
        self
    }

    /// Advance every registered timer by `delta` seconds.
    pub fn tick(&self, delta: f32) {
        for timer in &self.timers {
            timer.tick(delta);
        }
    }

    /// Number of registered timers currently running.
    pub fn running(&self) -> usize {
        self.timers.iter().filter(|t| t.is_running()).count()
    }

    pub fn pause_all(&self) {
        for timer in &self.timers {
            timer.pause();
        }
    }

    pub fn resume_all(&self) {
        for timer in &self.timers {
            timer.resume();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Timer> + '_ {
        self.timers.iter()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
