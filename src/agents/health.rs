//! Hit points with invincibility frames and change notifications.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Shared invincibility flag.
///
/// Timer observers hold a clone to toggle it (a dash grants invincibility
/// while it lasts) without borrowing the [`Health`] that reads it.
#[derive(Clone, Debug, Default)]
pub struct Invincibility(Rc<Cell<bool>>);

impl Invincibility {
    pub fn set(&self, invincible: bool) {
        self.0.set(invincible);
    }

    pub fn get(&self) -> bool {
        self.0.get()
    }
}

/// Hit points of an agent.
///
/// Observers registered with [`on_changed`](Self::on_changed) receive the
/// normalized health (`current / max`) after every applied hit, which is what
/// a HUD slider or a health event channel consumes.
pub struct Health {
    max: i32,
    current: i32,
    invincibility: Invincibility,
    observers: Vec<Box<dyn FnMut(f32)>>,
}

impl Health {
    /// Full health. `max` is raised to at least 1.
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self {
            max,
            current: max,
            invincibility: Invincibility::default(),
            observers: Vec::new(),
        }
    }

    /// Apply a hit. Returns `false` when the hit was ignored because the agent
    /// is invincible. Non-positive damage is ignored as well.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.invincibility.get() {
            tracing::trace!(amount, "damage ignored: invincible");
            return false;
        }
        if amount <= 0 {
            return false;
        }

        self.current = self.current.saturating_sub(amount);
        tracing::debug!(amount, current = self.current, "damage taken");
        self.publish();
        true
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// `current / max`, floored at zero.
    pub fn normalized(&self) -> f32 {
        (self.current as f32 / self.max as f32).max(0.0)
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility.get()
    }

    pub fn set_invincible(&self, invincible: bool) {
        self.invincibility.set(invincible);
    }

    /// Handle sharing this health's invincibility flag.
    pub fn invincibility(&self) -> Invincibility {
        self.invincibility.clone()
    }

    /// Subscribe to normalized health updates. The observer is immediately
    /// called with the current value.
    pub fn on_changed<F>(&mut self, mut observer: F)
    where
        F: FnMut(f32) + 'static,
    {
        observer(self.normalized());
        self.observers.push(Box::new(observer));
    }

    fn publish(&mut self) {
        let normalized = self.normalized();
        for observer in self.observers.iter_mut() {
            observer(normalized);
        }
    }
}

impl fmt::Debug for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Health")
            .field("max", &self.max)
            .field("current", &self.current)
            .field("invincible", &self.is_invincible())
            .finish_non_exhaustive()
    }
}
