//! Predicate-guarded transitions between states.

use crate::core::Predicate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_MACHINE_TAG: AtomicU32 = AtomicU32::new(1);

pub(crate) fn next_machine_tag() -> u32 {
    NEXT_MACHINE_TAG.fetch_add(1, Ordering::Relaxed)
}

/// Stable handle to a state registered with a
/// [`StateMachine`](crate::machine::StateMachine).
///
/// Handles carry the tag of the machine that issued them, so a handle from a
/// different machine is rejected instead of silently aliasing a state at the
/// same index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId {
    machine: u32,
    index: u32,
}

impl StateId {
    pub(crate) fn new(machine: u32, index: u32) -> Self {
        Self { machine, index }
    }

    /// Position of the state in its machine's arena, in registration order.
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub(crate) fn machine(&self) -> u32 {
        self.machine
    }

    pub(crate) fn raw_index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// Where a transition may fire from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Only while the given state is current.
    State(StateId),
    /// Whatever state is current.
    Any,
}

/// An immutable edge: leave `origin` for `to` once `condition` holds.
pub struct Transition<C = ()> {
    origin: Origin,
    to: StateId,
    condition: Box<dyn Predicate<C>>,
}

impl<C> Transition<C> {
    /// Edge that fires only while `from` is current.
    pub fn new<P>(from: StateId, to: StateId, condition: P) -> Self
    where
        P: Predicate<C> + 'static,
    {
        Self {
            origin: Origin::State(from),
            to,
            condition: Box::new(condition),
        }
    }

    /// Edge that fires from any state.
    pub fn any<P>(to: StateId, condition: P) -> Self
    where
        P: Predicate<C> + 'static,
    {
        Self {
            origin: Origin::Any,
            to,
            condition: Box::new(condition),
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn to(&self) -> StateId {
        self.to
    }

    pub fn is_any(&self) -> bool {
        matches!(self.origin, Origin::Any)
    }

    /// Evaluate the guard (pure).
    pub fn is_satisfied(&self, ctx: &C) -> bool {
        self.condition.evaluate(ctx)
    }
}

impl<C> fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("origin", &self.origin)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}
