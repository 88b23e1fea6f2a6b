//! Core capability contracts and the state change log.
//!
//! This module contains the pieces every machine is assembled from:
//! - Behavior units via the `State` trait
//! - Transition guards via the `Predicate` trait
//! - A bounded, serializable log of state changes

mod history;
mod predicate;
mod state;

pub use history::{Phase, TransitionLog, TransitionRecord, Via};
pub use predicate::{and, not, or, FuncPredicate, Predicate};
pub use state::State;
