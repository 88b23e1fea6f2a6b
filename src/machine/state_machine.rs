//! State machine that resolves transitions and dispatches per-frame hooks.

use crate::config::MachineConfig;
use crate::core::{Phase, Predicate, State, TransitionLog, TransitionRecord, Via};
use crate::machine::error::MachineError;
use crate::machine::transition::{next_machine_tag, Origin, StateId, Transition};
use chrono::Utc;
use std::fmt;

struct Slot<C> {
    state: Box<dyn State<C>>,
    transitions: Vec<Transition<C>>,
}

/// Finite state machine with predicate-guarded transitions.
///
/// The machine owns its states in an arena and hands out [`StateId`]
/// handles. `C` is the context passed to every hook and predicate, usually
/// the data of the agent that owns the machine.
///
/// Each call to [`update`](Self::update) or
/// [`fixed_update`](Self::fixed_update) resolves transitions once and then
/// runs the matching hook of the (possibly new) current state:
///
/// 1. Any-transitions are scanned in registration order. Entries targeting
///    the current state are skipped; the first satisfied one wins.
/// 2. Otherwise the current state's own transitions are scanned in
///    registration order; the first satisfied one wins. A self-loop here
///    re-runs `on_exit` and `on_enter` on the same state.
/// 3. At most one transition fires per call; the newly entered state is not
///    re-evaluated until the next call.
///
/// # Example
///
/// ```rust
/// use statecraft::core::State;
/// use statecraft::machine::StateMachine;
///
/// struct Agent {
///     alert: bool,
/// }
///
/// struct Idle;
/// struct Alarmed;
///
/// impl State<Agent> for Idle {}
/// impl State<Agent> for Alarmed {}
///
/// let mut agent = Agent { alert: false };
/// let mut machine = StateMachine::new();
/// let idle = machine.add_state(Idle);
/// let alarmed = machine.add_state(Alarmed);
///
/// machine
///     .add_transition(idle, alarmed, |a: &Agent| a.alert)
///     .unwrap();
/// machine.set_state(idle, &mut agent).unwrap();
///
/// assert_eq!(machine.update(&mut agent), None);
/// agent.alert = true;
/// assert_eq!(machine.update(&mut agent), Some(alarmed));
/// assert_eq!(machine.current_name(), Some("Alarmed"));
/// ```
pub struct StateMachine<C = ()> {
    tag: u32,
    states: Vec<Slot<C>>,
    any_transitions: Vec<Transition<C>>,
    current: Option<StateId>,
    history: TransitionLog,
    ticks: u64,
}

impl<C> StateMachine<C> {
    /// Create an empty machine with default settings.
    pub fn new() -> Self {
        Self::with_config(&MachineConfig::default())
    }

    pub fn with_config(config: &MachineConfig) -> Self {
        Self {
            tag: next_machine_tag(),
            states: Vec::new(),
            any_transitions: Vec::new(),
            current: None,
            history: TransitionLog::with_capacity(config.history_capacity),
            ticks: 0,
        }
    }

    /// Register a state and return its handle.
    pub fn add_state<S>(&mut self, state: S) -> StateId
    where
        S: State<C> + 'static,
    {
        let id = StateId::new(self.tag, self.states.len() as u32);
        self.states.push(Slot {
            state: Box::new(state),
            transitions: Vec::new(),
        });
        id
    }

    /// Check that `id` was issued by this machine.
    pub fn validate(&self, id: StateId) -> Result<(), MachineError> {
        if id.machine() != self.tag {
            return Err(MachineError::ForeignState {
                index: id.raw_index(),
                expected: self.tag,
                found: id.machine(),
            });
        }
        if id.index() >= self.states.len() {
            return Err(MachineError::UnknownState {
                index: id.raw_index(),
                len: self.states.len(),
            });
        }
        Ok(())
    }

    pub fn contains(&self, id: StateId) -> bool {
        self.validate(id).is_ok()
    }

    /// Make `id` the current state.
    ///
    /// Does nothing if `id` is already current. Otherwise exits the current
    /// state (if any) and enters `id`. The first call establishes the initial
    /// state.
    pub fn set_state(&mut self, id: StateId, ctx: &mut C) -> Result<(), MachineError> {
        self.validate(id)?;
        if self.current == Some(id) {
            return Ok(());
        }
        self.change_state(id, Via::Direct, None, ctx);
        Ok(())
    }

    /// Register a transition from `from` to `to`, guarded by `condition`.
    ///
    /// Transitions sharing a source are evaluated in registration order.
    pub fn add_transition<P>(
        &mut self,
        from: StateId,
        to: StateId,
        condition: P,
    ) -> Result<(), MachineError>
    where
        P: Predicate<C> + 'static,
    {
        self.validate(from).inspect_err(log_rejected)?;
        self.validate(to).inspect_err(log_rejected)?;
        self.states[from.index()]
            .transitions
            .push(Transition::new(from, to, condition));
        Ok(())
    }

    /// Register a transition to `to` that may fire from any state.
    ///
    /// Any-transitions take precedence over the current state's own
    /// transitions and never fire while `to` is already current.
    pub fn add_any_transition<P>(&mut self, to: StateId, condition: P) -> Result<(), MachineError>
    where
        P: Predicate<C> + 'static,
    {
        self.validate(to).inspect_err(log_rejected)?;
        self.any_transitions.push(Transition::any(to, condition));
        Ok(())
    }

    /// Store an edge whose endpoints were already validated.
    pub(crate) fn insert_validated(&mut self, transition: Transition<C>) {
        match transition.origin() {
            Origin::State(from) => self.states[from.index()].transitions.push(transition),
            Origin::Any => self.any_transitions.push(transition),
        }
    }

    /// Variable-timestep tick: resolve transitions, then run the current
    /// state's `update`.
    ///
    /// Returns the state entered by this call, if a transition fired. Without
    /// a current state the call is a no-op.
    pub fn update(&mut self, ctx: &mut C) -> Option<StateId> {
        let entered = self.resolve(Phase::Update, ctx);
        if let Some(current) = self.current {
            self.states[current.index()].state.update(ctx);
        }
        entered
    }

    /// Fixed-timestep tick: resolve transitions, then run the current
    /// state's `fixed_update`.
    ///
    /// Resolution is independent from [`update`](Self::update) so that
    /// conditions tied to either clock are observed promptly.
    pub fn fixed_update(&mut self, ctx: &mut C) -> Option<StateId> {
        let entered = self.resolve(Phase::FixedUpdate, ctx);
        if let Some(current) = self.current {
            self.states[current.index()].state.fixed_update(ctx);
        }
        entered
    }

    /// Exit the current state and leave the machine without one.
    ///
    /// Subsequent ticks are no-ops until [`set_state`](Self::set_state).
    pub fn clear_state(&mut self, ctx: &mut C) {
        if let Some(current) = self.current.take() {
            let slot = &mut self.states[current.index()];
            slot.state.on_exit(ctx);
            tracing::debug!(from = slot.state.name(), "state cleared");
        }
    }

    pub fn current(&self) -> Option<StateId> {
        self.current
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.and_then(|id| self.state_name(id))
    }

    pub fn state_name(&self, id: StateId) -> Option<&str> {
        self.validate(id).ok()?;
        Some(self.states[id.index()].state.name())
    }

    /// Number of registered states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Number of transitions registered with `id` as their source.
    pub fn transition_count(&self, id: StateId) -> usize {
        if self.contains(id) {
            self.states[id.index()].transitions.len()
        } else {
            0
        }
    }

    pub fn any_transition_count(&self) -> usize {
        self.any_transitions.len()
    }

    /// Recent state changes.
    pub fn history(&self) -> &TransitionLog {
        &self.history
    }

    /// Number of resolutions performed so far (both phases).
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn resolve(&mut self, phase: Phase, ctx: &mut C) -> Option<StateId> {
        let Some(current) = self.current else {
            tracing::debug!(?phase, "tick skipped: no current state");
            return None;
        };
        self.ticks += 1;

        let (to, via) = self.select(current, ctx)?;
        self.change_state(to, via, Some(phase), ctx);
        Some(to)
    }

    fn select(&self, current: StateId, ctx: &C) -> Option<(StateId, Via)> {
        let global = self
            .any_transitions
            .iter()
            .find(|t| t.to() != current && t.is_satisfied(ctx));
        if let Some(transition) = global {
            return Some((transition.to(), Via::Any));
        }

        self.states[current.index()]
            .transitions
            .iter()
            .find(|t| t.is_satisfied(ctx))
            .map(|t| (t.to(), Via::Edge))
    }

    fn change_state(&mut self, to: StateId, via: Via, phase: Option<Phase>, ctx: &mut C) {
        let from = self.current;
        if let Some(from) = from {
            self.states[from.index()].state.on_exit(ctx);
        }
        self.current = Some(to);
        self.states[to.index()].state.on_enter(ctx);

        let from_name = from.map(|id| self.states[id.index()].state.name());
        let to_name = self.states[to.index()].state.name();
        tracing::debug!(
            from = from_name.unwrap_or("<none>"),
            to = to_name,
            ?via,
            ?phase,
            "state transition"
        );

        if self.history.capacity() > 0 {
            let record = TransitionRecord {
                from,
                to,
                from_name: from_name.map(str::to_string),
                to_name: to_name.to_string(),
                via,
                phase,
                tick: self.ticks,
                timestamp: Utc::now(),
            };
            self.history.record(record);
        }
    }
}

fn log_rejected(error: &MachineError) {
    tracing::warn!(%error, "transition rejected");
}

impl<C> Default for StateMachine<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for StateMachine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("states", &self.states.len())
            .field("any_transitions", &self.any_transitions.len())
            .field("current", &self.current_name())
            .field("ticks", &self.ticks)
            .finish()
    }
}
