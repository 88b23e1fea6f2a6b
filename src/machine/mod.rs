//! Frame-driven state machine.
//!
//! This module holds the runtime half of the crate:
//! - `StateMachine`: arena of states, transition tables and per-frame dispatch
//! - `Transition`: immutable predicate-guarded edges, including any-state edges
//! - `StateId`: stable handles used as transition-table keys
//!
//! All operations run on the caller's thread and return within the frame that
//! invoked them. Only setup can fail; resolution has no error path.

mod error;
mod state_machine;
mod transition;

pub use error::MachineError;
pub use state_machine::StateMachine;
pub use transition::{Origin, StateId, Transition};
