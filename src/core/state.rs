//! Core State trait for state machine states.
//!
//! A state is a unit of behavior. The machine owns every state in an arena and
//! refers to them by [`StateId`](crate::machine::StateId), so identity never
//! depends on the data a state carries.

/// Trait for state machine states.
///
/// Every hook has an empty default so concrete states override only what
/// they need. Hooks receive the machine's context mutably; this is how a
/// state reaches its owning agent and the collaborators it drives.
///
/// Lifecycle guarantees given by the machine:
///
/// - `on_enter` runs exactly once each time the state becomes current.
/// - `on_exit` runs exactly once each time it stops being current.
/// - `update` / `fixed_update` run every frame the state is current, after
///   that frame's transition resolution.
///
/// # Example
///
/// ```rust
/// use statecraft::core::State;
///
/// struct Agent {
///     steps: u32,
/// }
///
/// struct Walk;
///
/// impl State<Agent> for Walk {
///     fn name(&self) -> &str {
///         "Walk"
///     }
///
///     fn fixed_update(&mut self, agent: &mut Agent) {
///         agent.steps += 1;
///     }
/// }
///
/// let mut agent = Agent { steps: 0 };
/// let mut walk = Walk;
/// walk.on_enter(&mut agent);
/// walk.fixed_update(&mut agent);
/// assert_eq!(agent.steps, 1);
/// ```
pub trait State<C = ()> {
    /// Name used in logs and the transition log.
    ///
    /// Defaults to the implementing type's name without its module path.
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Called once when the state becomes current.
    fn on_enter(&mut self, _ctx: &mut C) {}

    /// Called once when the state stops being current.
    fn on_exit(&mut self, _ctx: &mut C) {}

    /// Variable-timestep tick.
    fn update(&mut self, _ctx: &mut C) {}

    /// Fixed-timestep tick.
    fn fixed_update(&mut self, _ctx: &mut C) {}
}

fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
