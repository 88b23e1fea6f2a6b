//! Statecraft: frame-driven state machines and cooperative timers for game agents
//!
//! A host loop calls [`StateMachine::update`] once per rendered frame and
//! [`StateMachine::fixed_update`] once per physics step. Each call first
//! resolves at most one transition, then runs the current state's matching
//! hook. Transitions are guarded by predicates over the agent's context; any
//! state transitions are checked before the current state's own edges.
//!
//! Timers never read a clock. The agent ticks them with its frame delta and
//! reacts to their start and stop events, which is how jump durations, dash
//! cooldowns and attack windows are expressed.
//!
//! # Core Concepts
//!
//! - **State**: behavior unit with enter, exit and per-tick hooks
//! - **Predicate**: side-effect free condition guarding a transition
//! - **StateMachine**: arena of states plus ordered transition tables
//! - **Timer**: countdown or stopwatch with start and stop observers
//!
//! # Example
//!
//! ```rust
//! use statecraft::core::State;
//! use statecraft::machine::StateMachine;
//!
//! #[derive(Default)]
//! struct Door {
//!     pushed: bool,
//!     log: Vec<&'static str>,
//! }
//!
//! struct Closed;
//! struct Open;
//!
//! impl State<Door> for Closed {
//!     fn on_enter(&mut self, door: &mut Door) {
//!         door.log.push("closed");
//!     }
//! }
//!
//! impl State<Door> for Open {
//!     fn on_enter(&mut self, door: &mut Door) {
//!         door.log.push("open");
//!     }
//! }
//!
//! let mut door = Door::default();
//! let mut machine = StateMachine::new();
//! let closed = machine.add_state(Closed);
//! let open = machine.add_state(Open);
//! machine
//!     .add_transition(closed, open, |d: &Door| d.pushed)
//!     .unwrap();
//! machine.set_state(closed, &mut door).unwrap();
//!
//! door.pushed = true;
//! machine.update(&mut door);
//!
//! assert_eq!(machine.current(), Some(open));
//! assert_eq!(door.log, vec!["closed", "open"]);
//! ```

pub mod agents;
pub mod builder;
pub mod config;
pub mod core;
pub mod machine;
pub mod timer;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder};
pub use config::{ConfigError, EnemyConfig, MachineConfig, PlayerConfig};
pub use core::{FuncPredicate, Predicate, State, TransitionLog, TransitionRecord};
pub use machine::{MachineError, StateId, StateMachine, Transition};
pub use timer::{Timer, TimerKind, TimerSet, WeakTimer};
