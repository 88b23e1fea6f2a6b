//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::config::MachineConfig;
use crate::core::{Predicate, State};
use crate::machine::{MachineError, Origin, StateId, StateMachine, Transition};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder that collects states and edges, validates them all at once and
/// enters the initial state.
///
/// Unlike the direct [`StateMachine`] API, which rejects a bad edge as soon as
/// it is added, the builder reports every bad endpoint in a single
/// [`BuildError::InvalidTransitions`].
///
/// # Example
///
/// ```rust
/// use statecraft::builder::StateMachineBuilder;
/// use statecraft::core::State;
///
/// struct Guard {
///     hp: i32,
///     sees_player: bool,
/// }
///
/// struct Patrol;
/// struct Chase;
/// struct Dead;
///
/// impl State<Guard> for Patrol {}
/// impl State<Guard> for Chase {}
/// impl State<Guard> for Dead {}
///
/// let mut builder = StateMachineBuilder::new();
/// let patrol = builder.state(Patrol);
/// let chase = builder.state(Chase);
/// let dead = builder.state(Dead);
///
/// builder
///     .at(patrol, chase, |g: &Guard| g.sees_player)
///     .at(chase, patrol, |g: &Guard| !g.sees_player)
///     .any(dead, |g: &Guard| g.hp <= 0)
///     .initial(patrol);
///
/// let mut guard = Guard { hp: 10, sees_player: false };
/// let mut machine = builder.build(&mut guard).unwrap();
/// assert_eq!(machine.current(), Some(patrol));
///
/// guard.hp = 0;
/// machine.update(&mut guard);
/// assert_eq!(machine.current(), Some(dead));
/// ```
pub struct StateMachineBuilder<C = ()> {
    machine: StateMachine<C>,
    edges: Vec<Transition<C>>,
    initial: Option<StateId>,
}

impl<C> StateMachineBuilder<C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::with_config(&MachineConfig::default())
    }

    pub fn with_config(config: &MachineConfig) -> Self {
        Self {
            machine: StateMachine::with_config(config),
            edges: Vec::new(),
            initial: None,
        }
    }

    /// Register a state and return its handle.
    pub fn state<S>(&mut self, state: S) -> StateId
    where
        S: State<C> + 'static,
    {
        self.machine.add_state(state)
    }

    /// Add a from-specific transition.
    pub fn at<P>(&mut self, from: StateId, to: StateId, condition: P) -> &mut Self
    where
        P: Predicate<C> + 'static,
    {
        self.edges.push(Transition::new(from, to, condition));
        self
    }

    /// Add a transition that may fire from any state.
    pub fn any<P>(&mut self, to: StateId, condition: P) -> &mut Self
    where
        P: Predicate<C> + 'static,
    {
        self.edges.push(Transition::any(to, condition));
        self
    }

    /// Set the initial state (required).
    pub fn initial(&mut self, id: StateId) -> &mut Self {
        self.initial = Some(id);
        self
    }

    /// Validate every edge, then enter the initial state.
    pub fn build(self, ctx: &mut C) -> Result<StateMachine<C>, BuildError> {
        let Self {
            mut machine,
            edges,
            initial,
        } = self;

        if machine.is_empty() {
            return Err(BuildError::NoStates);
        }
        let initial = initial.ok_or(BuildError::MissingInitialState)?;

        let checks: Vec<Validation<(), NonEmptyVec<MachineError>>> = edges
            .iter()
            .flat_map(endpoints)
            .map(|id| match machine.validate(id) {
                Ok(()) => Validation::success(()),
                Err(error) => Validation::fail(error),
            })
            .collect();

        if let Validation::Failure(errors) = Validation::all_vec(checks) {
            let errors: Vec<MachineError> = errors.iter().cloned().collect();
            tracing::warn!(count = errors.len(), "state machine rejected invalid transitions");
            return Err(BuildError::InvalidTransitions(errors));
        }

        for edge in edges {
            machine.insert_validated(edge);
        }
        machine.set_state(initial, ctx)?;

        Ok(machine)
    }
}

fn endpoints<C>(edge: &Transition<C>) -> Vec<StateId> {
    match edge.origin() {
        Origin::State(from) => vec![from, edge.to()],
        Origin::Any => vec![edge.to()],
    }
}

impl<C> Default for StateMachineBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Agent {
        entered: Vec<&'static str>,
        flag: bool,
    }

    struct Named(&'static str);

    impl State<Agent> for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn on_enter(&mut self, agent: &mut Agent) {
            agent.entered.push(self.0);
        }
    }

    #[test]
    fn builder_requires_states() {
        let result = StateMachineBuilder::<Agent>::new().build(&mut Agent::default());
        assert!(matches!(result, Err(BuildError::NoStates)));
    }

    #[test]
    fn builder_requires_initial_state() {
        let mut builder = StateMachineBuilder::<Agent>::new();
        builder.state(Named("A"));

        let result = builder.build(&mut Agent::default());
        assert!(matches!(result, Err(BuildError::MissingInitialState)));
    }

    #[test]
    fn build_enters_initial_state() {
        let mut builder = StateMachineBuilder::new();
        let a = builder.state(Named("A"));
        builder.state(Named("B"));
        builder.initial(a);

        let mut agent = Agent::default();
        let machine = builder.build(&mut agent).unwrap();

        assert_eq!(machine.current(), Some(a));
        assert_eq!(agent.entered, vec!["A"]);
    }

    #[test]
    fn build_wires_edges_in_order() {
        let mut builder = StateMachineBuilder::new();
        let a = builder.state(Named("A"));
        let b = builder.state(Named("B"));
        let c = builder.state(Named("C"));
        builder
            .at(a, c, |ag: &Agent| ag.flag)
            .at(a, b, |ag: &Agent| ag.flag)
            .initial(a);

        let mut agent = Agent::default();
        let mut machine = builder.build(&mut agent).unwrap();
        assert_eq!(machine.transition_count(a), 2);

        agent.flag = true;
        assert_eq!(machine.update(&mut agent), Some(c));
    }

    #[test]
    fn build_accumulates_all_invalid_endpoints() {
        let mut other = StateMachine::<Agent>::new();
        let stray_a = other.add_state(Named("X"));
        let stray_b = other.add_state(Named("Y"));

        let mut builder = StateMachineBuilder::new();
        let a = builder.state(Named("A"));
        builder
            .at(a, stray_a, |_: &Agent| true)
            .at(stray_b, a, |_: &Agent| true)
            .any(stray_a, |_: &Agent| true)
            .initial(a);

        match builder.build(&mut Agent::default()) {
            Err(BuildError::InvalidTransitions(errors)) => {
                assert_eq!(errors.len(), 3);
                assert!(errors
                    .iter()
                    .all(|e| matches!(e, MachineError::ForeignState { .. })));
            }
            other => panic!("Expected InvalidTransitions, got {other:?}"),
        }
    }

    #[test]
    fn foreign_initial_state_is_rejected() {
        let mut other = StateMachine::<Agent>::new();
        let stray = other.add_state(Named("X"));

        let mut builder = StateMachineBuilder::new();
        builder.state(Named("A"));
        builder.initial(stray);

        let result = builder.build(&mut Agent::default());
        assert!(matches!(
            result,
            Err(BuildError::Machine(MachineError::ForeignState { .. }))
        ));
    }
}
