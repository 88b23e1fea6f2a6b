//! Cooperative countdown and stopwatch timers.
//!
//! Timers carry all the temporal bookkeeping of an agent: how long a jump
//! lasts, when a dash cooldown ends, how often an enemy may strike. They never
//! read a clock; the owning agent advances them once per frame with
//! [`Timer::tick`] (usually through a [`TimerSet`]). Pausing the game is
//! therefore just a matter of withholding ticks.
//!
//! A [`Timer`] is a cheap, clonable handle. The owning agent is the single
//! writer; predicates and observers hold clones to read its state. Handles are
//! reference counted and not thread-safe, matching the single-threaded frame
//! loop they live in.
//!
//! # Example
//!
//! ```rust
//! use statecraft::timer::Timer;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let dash = Timer::countdown(0.5);
//! let stops = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&stops);
//! dash.on_stop(move || counter.set(counter.get() + 1));
//!
//! dash.start();
//! dash.tick(0.3);
//! assert!(dash.is_running());
//! assert!((dash.progress() - 0.6).abs() < 1e-5);
//!
//! dash.tick(0.3);
//! assert!(!dash.is_running());
//! assert_eq!(dash.time(), 0.0);
//! assert_eq!(stops.get(), 1);
//! ```

mod observers;
mod set;

pub use set::TimerSet;

use observers::ObserverList;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// How a timer measures time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimerKind {
    /// Counts down from `duration` seconds and stops itself at zero.
    Countdown { duration: f32 },
    /// Counts up from zero until stopped.
    Stopwatch,
}

#[derive(Debug)]
struct Clock {
    kind: TimerKind,
    time: f32,
    running: bool,
    paused: bool,
    finished: bool,
}

impl Clock {
    fn rewind(&mut self) {
        self.time = match self.kind {
            TimerKind::Countdown { duration } => duration,
            TimerKind::Stopwatch => 0.0,
        };
        self.finished = false;
    }
}

struct Inner {
    clock: RefCell<Clock>,
    on_start: ObserverList,
    on_stop: ObserverList,
}

/// Shared handle to a countdown or stopwatch timer.
///
/// Cloning the handle does not copy the timer; all clones observe and drive
/// the same clock.
#[derive(Clone)]
pub struct Timer {
    inner: Rc<Inner>,
}

impl Timer {
    fn with_kind(kind: TimerKind) -> Self {
        let mut clock = Clock {
            kind,
            time: 0.0,
            running: false,
            paused: false,
            finished: false,
        };
        clock.rewind();

        Self {
            inner: Rc::new(Inner {
                clock: RefCell::new(clock),
                on_start: ObserverList::default(),
                on_stop: ObserverList::default(),
            }),
        }
    }

    /// Create a stopped countdown timer.
    ///
    /// Negative or NaN durations are clamped to zero.
    pub fn countdown(duration: f32) -> Self {
        Self::with_kind(TimerKind::Countdown {
            duration: duration.max(0.0),
        })
    }

    /// Create a stopped stopwatch.
    pub fn stopwatch() -> Self {
        Self::with_kind(TimerKind::Stopwatch)
    }

    /// (Re)start the timer and notify start observers.
    ///
    /// Resets the clock to `duration` (countdown) or `0` (stopwatch). Starting
    /// a running timer restarts it without a stop notification.
    pub fn start(&self) {
        {
            let mut clock = self.inner.clock.borrow_mut();
            clock.rewind();
            clock.running = true;
            clock.paused = false;
            tracing::trace!(kind = ?clock.kind, "timer started");
        }
        self.inner.on_start.notify();
    }

    /// Stop the timer and notify stop observers.
    ///
    /// Observers are notified once per running to stopped change; stopping a
    /// timer that is already stopped does nothing. A paused timer counts as
    /// running here.
    pub fn stop(&self) {
        let was_active = {
            let mut clock = self.inner.clock.borrow_mut();
            let was_active = clock.running || clock.paused;
            clock.running = false;
            clock.paused = false;
            was_active
        };

        if was_active {
            tracing::trace!("timer stopped");
            self.inner.on_stop.notify();
        }
    }

    /// Advance the timer by `delta` seconds.
    ///
    /// No-op unless running. Negative or NaN deltas count as zero. A countdown
    /// reaching zero is clamped to zero and stopped, which notifies stop
    /// observers before this call returns.
    pub fn tick(&self, delta: f32) {
        let delta = delta.max(0.0);
        let expired = {
            let mut clock = self.inner.clock.borrow_mut();
            if !clock.running {
                return;
            }
            match clock.kind {
                TimerKind::Countdown { .. } => {
                    clock.time = (clock.time - delta).max(0.0);
                    if clock.time <= 0.0 {
                        clock.finished = true;
                        true
                    } else {
                        false
                    }
                }
                TimerKind::Stopwatch => {
                    clock.time += delta;
                    false
                }
            }
        };

        if expired {
            tracing::trace!("timer expired");
            self.stop();
        }
    }

    /// Suspend ticking without notifying observers.
    ///
    /// Only affects a running timer. `is_running` reports `false` until
    /// [`resume`](Self::resume).
    pub fn pause(&self) {
        let mut clock = self.inner.clock.borrow_mut();
        if clock.running {
            clock.running = false;
            clock.paused = true;
        }
    }

    /// Continue a paused timer. Has no effect on a stopped timer.
    pub fn resume(&self) {
        let mut clock = self.inner.clock.borrow_mut();
        if clock.paused {
            clock.paused = false;
            clock.running = true;
        }
    }

    /// Rewind the clock without changing the run state or notifying anyone.
    pub fn reset(&self) {
        self.inner.clock.borrow_mut().rewind();
    }

    pub fn is_running(&self) -> bool {
        self.inner.clock.borrow().running
    }

    pub fn is_paused(&self) -> bool {
        self.inner.clock.borrow().paused
    }

    /// True while a running countdown sits at zero, and after it stopped by
    /// expiring until it is restarted or reset. Always false for a stopwatch.
    pub fn is_finished(&self) -> bool {
        let clock = self.inner.clock.borrow();
        let at_zero = matches!(clock.kind, TimerKind::Countdown { .. }) && clock.time <= 0.0;
        clock.finished || (clock.running && at_zero)
    }

    /// Remaining seconds (countdown) or elapsed seconds (stopwatch).
    pub fn time(&self) -> f32 {
        self.inner.clock.borrow().time
    }

    /// Configured countdown duration; `None` for a stopwatch.
    pub fn duration(&self) -> Option<f32> {
        match self.inner.clock.borrow().kind {
            TimerKind::Countdown { duration } => Some(duration),
            TimerKind::Stopwatch => None,
        }
    }

    pub fn kind(&self) -> TimerKind {
        self.inner.clock.borrow().kind
    }

    /// Fraction of the countdown already elapsed, in `[0, 1]`.
    ///
    /// A zero-length countdown reports `1.0`. A stopwatch has no end and
    /// reports `0.0`.
    pub fn progress(&self) -> f32 {
        let clock = self.inner.clock.borrow();
        match clock.kind {
            TimerKind::Countdown { duration } if duration > 0.0 => {
                (1.0 - clock.time / duration).clamp(0.0, 1.0)
            }
            TimerKind::Countdown { .. } => 1.0,
            TimerKind::Stopwatch => 0.0,
        }
    }

    /// Subscribe to start notifications. Observers run in subscription order.
    pub fn on_start<F>(&self, observer: F)
    where
        F: FnMut() + 'static,
    {
        self.inner.on_start.subscribe(Box::new(observer));
    }

    /// Subscribe to stop notifications, including expiry of a countdown.
    /// Observers run in subscription order.
    pub fn on_stop<F>(&self, observer: F)
    where
        F: FnMut() + 'static,
    {
        self.inner.on_stop.subscribe(Box::new(observer));
    }

    /// Non-owning handle, for observers that refer back to their own timer.
    pub fn downgrade(&self) -> WeakTimer {
        WeakTimer {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// True when both handles drive the same clock.
    pub fn ptr_eq(&self, other: &Timer) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clock = self.inner.clock.borrow();
        f.debug_struct("Timer")
            .field("kind", &clock.kind)
            .field("time", &clock.time)
            .field("running", &clock.running)
            .field("paused", &clock.paused)
            .field("finished", &clock.finished)
            .field("start_observers", &self.inner.on_start.len())
            .field("stop_observers", &self.inner.on_stop.len())
            .finish()
    }
}

/// Weak counterpart of [`Timer`].
#[derive(Clone, Debug, Default)]
pub struct WeakTimer {
    inner: Weak<Inner>,
}

impl WeakTimer {
    pub fn upgrade(&self) -> Option<Timer> {
        self.inner.upgrade().map(|inner| Timer { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter(timer: &Timer) -> (Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let starts = Rc::new(Cell::new(0));
        let stops = Rc::new(Cell::new(0));
        let s = Rc::clone(&starts);
        timer.on_start(move || s.set(s.get() + 1));
        let s = Rc::clone(&stops);
        timer.on_stop(move || s.set(s.get() + 1));
        (starts, stops)
    }

    #[test]
    fn new_countdown_is_stopped_and_full() {
        let timer = Timer::countdown(2.0);
        assert!(!timer.is_running());
        assert!(!timer.is_finished());
        assert_eq!(timer.time(), 2.0);
        assert_eq!(timer.duration(), Some(2.0));
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn start_fires_start_event() {
        let timer = Timer::countdown(1.0);
        let (starts, stops) = counter(&timer);

        timer.start();

        assert!(timer.is_running());
        assert_eq!(starts.get(), 1);
        assert_eq!(stops.get(), 0);
    }

    #[test]
    fn full_tick_expires_countdown_once() {
        let timer = Timer::countdown(1.0);
        let (_, stops) = counter(&timer);

        timer.start();
        timer.tick(1.0);

        assert!(!timer.is_running());
        assert!(timer.is_finished());
        assert_eq!(stops.get(), 1);

        timer.tick(1.0);
        assert_eq!(stops.get(), 1);
    }

    #[test]
    fn half_tick_keeps_running() {
        let timer = Timer::countdown(1.0);
        timer.start();
        timer.tick(0.5);

        assert!(timer.is_running());
        assert!(!timer.is_finished());
        assert!((timer.progress() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn overshoot_is_clamped_to_zero() {
        let timer = Timer::countdown(0.5);
        timer.start();
        timer.tick(0.3);
        timer.tick(0.3);

        assert_eq!(timer.time(), 0.0);
        assert_eq!(timer.progress(), 1.0);
    }

    #[test]
    fn stop_twice_fires_once() {
        let timer = Timer::countdown(1.0);
        let (_, stops) = counter(&timer);

        timer.start();
        timer.stop();
        timer.stop();

        assert_eq!(stops.get(), 1);
        assert!(!timer.is_finished());
    }

    #[test]
    fn stop_on_stopped_timer_is_silent() {
        let timer = Timer::countdown(1.0);
        let (_, stops) = counter(&timer);

        timer.stop();
        assert_eq!(stops.get(), 0);
    }

    #[test]
    fn tick_is_noop_when_stopped() {
        let timer = Timer::countdown(1.0);
        timer.tick(0.4);
        assert_eq!(timer.time(), 1.0);

        let watch = Timer::stopwatch();
        watch.tick(0.4);
        assert_eq!(watch.time(), 0.0);
    }

    #[test]
    fn negative_delta_is_clamped() {
        let timer = Timer::countdown(1.0);
        timer.start();
        timer.tick(-5.0);
        assert_eq!(timer.time(), 1.0);
        assert!(timer.is_running());

        timer.tick(f32::NAN);
        assert_eq!(timer.time(), 1.0);
    }

    #[test]
    fn restart_resets_cleanly() {
        let timer = Timer::countdown(1.0);
        let (starts, stops) = counter(&timer);

        timer.start();
        timer.tick(0.7);
        timer.start();

        assert_eq!(timer.time(), 1.0);
        assert!(timer.is_running());
        assert_eq!(starts.get(), 2);
        assert_eq!(stops.get(), 0);
    }

    #[test]
    fn zero_duration_countdown_expires_on_first_tick() {
        let timer = Timer::countdown(0.0);
        let (_, stops) = counter(&timer);

        timer.start();
        assert!(timer.is_running());
        assert_eq!(timer.progress(), 1.0);

        timer.tick(0.0);
        assert!(!timer.is_running());
        assert_eq!(stops.get(), 1);
    }

    #[test]
    fn started_zero_duration_countdown_is_finished() {
        let timer = Timer::countdown(0.0);
        assert!(!timer.is_finished());

        timer.start();
        assert!(timer.is_running());
        assert!(timer.is_finished());

        timer.tick(0.0);
        assert!(timer.is_finished());

        timer.reset();
        timer.stop();
        assert!(!timer.is_finished());
    }

    #[test]
    fn stopwatch_is_never_finished() {
        let timer = Timer::stopwatch();
        timer.start();
        assert!(!timer.is_finished());
    }

    #[test]
    fn negative_duration_is_clamped() {
        let timer = Timer::countdown(-3.0);
        assert_eq!(timer.duration(), Some(0.0));
    }

    #[test]
    fn stopwatch_counts_up_without_expiry() {
        let watch = Timer::stopwatch();
        let (_, stops) = counter(&watch);

        watch.start();
        watch.tick(10.0);
        watch.tick(5.0);

        assert!(watch.is_running());
        assert_eq!(watch.time(), 15.0);
        assert_eq!(watch.progress(), 0.0);
        assert_eq!(watch.duration(), None);

        watch.stop();
        assert_eq!(stops.get(), 1);
        assert_eq!(watch.time(), 15.0);
    }

    #[test]
    fn pause_suspends_ticks_silently() {
        let timer = Timer::countdown(1.0);
        let (starts, stops) = counter(&timer);

        timer.start();
        timer.tick(0.25);
        timer.pause();
        timer.tick(0.5);

        assert!(!timer.is_running());
        assert!(timer.is_paused());
        assert_eq!(timer.time(), 0.75);

        timer.resume();
        timer.tick(0.25);
        assert!(timer.is_running());
        assert_eq!(timer.time(), 0.5);
        assert_eq!(starts.get(), 1);
        assert_eq!(stops.get(), 0);
    }

    #[test]
    fn resume_does_not_revive_stopped_timer() {
        let timer = Timer::countdown(1.0);
        timer.start();
        timer.stop();
        timer.resume();
        assert!(!timer.is_running());
    }

    #[test]
    fn stopping_paused_timer_notifies() {
        let timer = Timer::countdown(1.0);
        let (_, stops) = counter(&timer);

        timer.start();
        timer.pause();
        timer.stop();

        assert_eq!(stops.get(), 1);
        assert!(!timer.is_paused());
    }

    #[test]
    fn reset_rewinds_without_events() {
        let timer = Timer::countdown(1.0);
        let (starts, stops) = counter(&timer);

        timer.start();
        timer.tick(0.6);
        timer.reset();

        assert!(timer.is_running());
        assert_eq!(timer.time(), 1.0);
        assert_eq!(starts.get(), 1);
        assert_eq!(stops.get(), 0);
    }

    #[test]
    fn clones_share_the_clock() {
        let timer = Timer::countdown(1.0);
        let reader = timer.clone();

        timer.start();
        assert!(reader.is_running());
        assert!(reader.ptr_eq(&timer));
        assert!(!reader.ptr_eq(&Timer::countdown(1.0)));
    }

    #[test]
    fn stop_observer_can_start_another_timer() {
        let jump = Timer::countdown(0.5);
        let cooldown = Timer::countdown(0.2);

        let cd = cooldown.clone();
        jump.on_stop(move || cd.start());

        jump.start();
        jump.tick(0.5);

        assert!(!jump.is_running());
        assert!(cooldown.is_running());
    }

    #[test]
    fn start_observer_restarting_its_own_timer_is_not_renotified() {
        let timer = Timer::countdown(1.0);
        let starts = Rc::new(Cell::new(0));

        let weak = timer.downgrade();
        let s = Rc::clone(&starts);
        timer.on_start(move || {
            s.set(s.get() + 1);
            if let Some(timer) = weak.upgrade() {
                timer.start();
            }
        });

        timer.start();
        assert!(timer.is_running());
        assert_eq!(starts.get(), 1);

        timer.start();
        assert_eq!(starts.get(), 2);
    }

    #[test]
    fn stop_observer_can_restart_its_own_timer() {
        let cooldown = Timer::countdown(1.0);
        let strikes = Rc::new(Cell::new(0));

        let weak = cooldown.downgrade();
        let s = Rc::clone(&strikes);
        cooldown.on_stop(move || {
            s.set(s.get() + 1);
            if let Some(timer) = weak.upgrade() {
                timer.start();
            }
        });

        cooldown.start();
        cooldown.tick(1.0);
        assert!(cooldown.is_running());
        assert_eq!(strikes.get(), 1);

        cooldown.tick(1.0);
        assert!(cooldown.is_running());
        assert_eq!(strikes.get(), 2);
    }

    #[test]
    fn observers_run_in_subscription_order() {
        let timer = Timer::countdown(1.0);
        let order = Rc::new(RefCell::new(Vec::new()));

        for label in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            timer.on_start(move || order.borrow_mut().push(label));
        }

        timer.start();
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn weak_handle_expires_with_timer() {
        let timer = Timer::countdown(1.0);
        let weak = timer.downgrade();
        assert!(weak.upgrade().is_some());

        drop(timer);
        assert!(weak.upgrade().is_none());
    }
}
