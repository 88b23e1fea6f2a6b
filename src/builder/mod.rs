//! Builder API for ergonomic state machine construction.
//!
//! The builder mirrors the way agents wire their machines: register states,
//! declare edges with `at` / `any`, pick the initial state, build. Every
//! configuration mistake is reported at build time instead of surfacing as
//! an edge that silently never fires.

pub mod error;
pub mod machine;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
