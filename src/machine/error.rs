//! Machine configuration errors.

use thiserror::Error;

/// Errors raised while wiring a state machine.
///
/// Only setup operations fail; per-frame resolution has no error path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("State {index} is not registered (machine has {len} states)")]
    UnknownState { index: u32, len: usize },

    #[error("State {index} belongs to machine {found}, not machine {expected}")]
    ForeignState { index: u32, expected: u32, found: u32 },
}
