//! State change log.
//!
//! The machine appends one [`TransitionRecord`] per state change into a
//! bounded [`TransitionLog`]. Records are serializable so a debug overlay or a
//! test can dump the recent behavior of an agent.

use crate::machine::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// What caused a state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Via {
    /// Explicit `set_state` call.
    Direct,
    /// From-specific transition registered with `add_transition`.
    Edge,
    /// Global transition registered with `add_any_transition`.
    Any,
}

/// Update phase during which a transition fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Update,
    FixedUpdate,
}

/// Record of a single state change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// State that was exited, `None` for the initial assignment
    pub from: Option<StateId>,
    /// State that was entered
    pub to: StateId,
    pub from_name: Option<String>,
    pub to_name: String,
    pub via: Via,
    /// `None` when the change came from a direct `set_state`
    pub phase: Option<Phase>,
    /// Value of the machine's resolution counter when the change happened
    pub tick: u64,
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    /// True when the same state instance was exited and entered again.
    pub fn is_reentry(&self) -> bool {
        self.from == Some(self.to)
    }
}

/// Bounded, ordered log of state changes.
///
/// Once `capacity` records are stored the oldest one is evicted. A log with
/// capacity `0` records nothing.
///
/// # Example
///
/// ```rust
/// use statecraft::core::TransitionLog;
///
/// let log = TransitionLog::with_capacity(8);
/// assert!(log.is_empty());
/// assert!(log.path().is_empty());
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransitionLog {
    capacity: usize,
    records: VecDeque<TransitionRecord>,
}

impl TransitionLog {
    /// Create an empty log holding at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a record, evicting the oldest one when full.
    pub fn record(&mut self, record: TransitionRecord) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Names of the states traversed, oldest first.
    ///
    /// Starts with the `from` of the oldest retained record (when there is
    /// one), followed by the `to` of every record.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(name) = self.records.front().and_then(|r| r.from_name.as_deref()) {
            path.push(name);
        }
        for record in &self.records {
            path.push(record.to_name.as_str());
        }
        path
    }

    /// Wall-clock span between the oldest and newest retained record.
    pub fn span(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord> + '_ {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
