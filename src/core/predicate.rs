//! Predicates that gate state transitions.
//!
//! A predicate is a side-effect free boolean check. It receives a shared
//! reference to the machine's context (the owning agent's data) so that it can
//! read timers, health or collaborator queries without capturing the agent.
//! With the default `()` context it is a plain zero-argument check.

/// Boolean condition evaluated during transition resolution.
///
/// Evaluation must be side-effect free: the machine may evaluate the same
/// predicate more than once per frame and expects the same answer each time.
///
/// Any `Fn(&C) -> bool` closure is a predicate:
///
/// ```rust
/// use statecraft::core::Predicate;
///
/// struct Agent {
///     hp: i32,
/// }
///
/// let is_dead = |agent: &Agent| agent.hp <= 0;
///
/// assert!(is_dead.evaluate(&Agent { hp: 0 }));
/// assert!(!is_dead.evaluate(&Agent { hp: 10 }));
/// ```
pub trait Predicate<C = ()> {
    /// Evaluate the condition against the current context.
    fn evaluate(&self, ctx: &C) -> bool;
}

impl<C, F> Predicate<C> for F
where
    F: Fn(&C) -> bool,
{
    fn evaluate(&self, ctx: &C) -> bool {
        self(ctx)
    }
}

/// Predicate backed by a zero-argument closure.
///
/// The closure ignores the machine context, so one `FuncPredicate` works with
/// any context type. Useful when the condition closes over shared handles
/// such as a [`Timer`](crate::timer::Timer).
///
/// # Example
///
/// ```rust
/// use statecraft::core::{FuncPredicate, Predicate};
/// use statecraft::timer::Timer;
///
/// let jump = Timer::countdown(0.5);
/// let handle = jump.clone();
/// let jumping = FuncPredicate::new(move || handle.is_running());
///
/// assert!(!jumping.evaluate(&()));
/// jump.start();
/// assert!(jumping.evaluate(&()));
/// ```
pub struct FuncPredicate {
    func: Box<dyn Fn() -> bool>,
}

impl FuncPredicate {
    /// Wrap a zero-argument closure.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        Self {
            func: Box::new(func),
        }
    }
}

impl<C> Predicate<C> for FuncPredicate {
    fn evaluate(&self, _ctx: &C) -> bool {
        (self.func)()
    }
}

impl std::fmt::Debug for FuncPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuncPredicate").finish_non_exhaustive()
    }
}

/// Negate a predicate.
pub fn not<C, P>(predicate: P) -> impl Fn(&C) -> bool
where
    P: Predicate<C>,
{
    move |ctx: &C| !predicate.evaluate(ctx)
}

/// Both predicates hold. Short-circuits on the left operand.
pub fn and<C, L, R>(left: L, right: R) -> impl Fn(&C) -> bool
where
    L: Predicate<C>,
    R: Predicate<C>,
{
    move |ctx: &C| left.evaluate(ctx) && right.evaluate(ctx)
}

/// Either predicate holds. Short-circuits on the left operand.
pub fn or<C, L, R>(left: L, right: R) -> impl Fn(&C) -> bool
where
    L: Predicate<C>,
    R: Predicate<C>,
{
    move |ctx: &C| left.evaluate(ctx) || right.evaluate(ctx)
}
