//! Build errors for the state machine builder.

use crate::machine::MachineError;
use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("No states registered. Call .state(...) before .build()")]
    NoStates,

    #[error("Initial state not specified. Call .initial(id) before .build()")]
    MissingInitialState,

    #[error("{} transition endpoint(s) do not belong to this machine", .0.len())]
    InvalidTransitions(Vec<MachineError>),

    #[error(transparent)]
    Machine(#[from] MachineError),
}
