//! Player brain: locomotion, jump, dash and attack driven by input-started
//! timers.
//!
//! Input handlers only start or stop timers. The machine then reacts to the
//! timers on its next tick: a running jump timer moves locomotion into the
//! jump state, an expired attack timer brings the attack state back to
//! locomotion, and so on. Timer events carry the side effects that must
//! happen exactly once per action (setting the jump impulse, granting dash
//! invincibility, arming cooldowns).

use crate::agents::animation::{Animator, Clip};
use crate::agents::health::Health;
use crate::builder::{BuildError, StateMachineBuilder};
use crate::config::PlayerConfig;
use crate::core::State;
use crate::machine::StateMachine;
use crate::timer::{Timer, TimerSet};
use std::cell::Cell;
use std::rc::Rc;

/// Engine side of the player.
pub trait PlayerRig: Animator {
    fn is_grounded(&self) -> bool;

    /// Move along the current input direction at `speed` units per fixed tick.
    /// A speed of zero means stop horizontally.
    fn move_horizontal(&mut self, speed: f32);

    fn set_vertical_velocity(&mut self, velocity: f32);

    /// Damage everything hittable within `reach` in front of the player.
    fn strike(&mut self, reach: f32, damage: i32);
}

/// Action timers of the player.
#[derive(Debug)]
pub struct PlayerTimers {
    pub jump: Timer,
    pub jump_cooldown: Timer,
    pub dash: Timer,
    pub dash_cooldown: Timer,
    pub attack: Timer,
}

impl PlayerTimers {
    fn any_action_running(&self) -> bool {
        self.jump.is_running() || self.dash.is_running() || self.attack.is_running()
    }
}

/// Context shared by the player's states and predicates.
#[derive(Debug)]
pub struct PlayerBody<R> {
    pub rig: R,
    pub health: Health,
    pub timers: PlayerTimers,
    jump_velocity: Rc<Cell<f32>>,
    dash_multiplier: Rc<Cell<f32>>,
    config: PlayerConfig,
}

impl<R: PlayerRig> PlayerBody<R> {
    pub fn jump_velocity(&self) -> f32 {
        self.jump_velocity.get()
    }

    pub fn dash_multiplier(&self) -> f32 {
        self.dash_multiplier.get()
    }

    fn handle_movement(&mut self) {
        let speed = self.config.move_speed * self.dash_multiplier.get() * self.config.fixed_delta;
        self.rig.move_horizontal(speed);
    }

    fn handle_jump(&mut self) {
        let jumping = self.timers.jump.is_running();
        if !jumping && self.rig.is_grounded() {
            self.jump_velocity.set(0.0);
            return;
        }

        if !jumping {
            let fall = self.config.gravity * self.config.gravity_multiplier * self.config.fixed_delta;
            self.jump_velocity.set(self.jump_velocity.get() + fall);
        }
        self.rig.set_vertical_velocity(self.jump_velocity.get());
    }

    fn cross_fade(&mut self, clip: Clip) {
        self.rig.cross_fade(clip, self.config.crossfade);
    }
}

#[derive(Debug)]
pub struct LocomotionState;

impl<R: PlayerRig> State<PlayerBody<R>> for LocomotionState {
    fn name(&self) -> &str {
        "Locomotion"
    }

    fn on_enter(&mut self, body: &mut PlayerBody<R>) {
        body.cross_fade(Clip::Locomotion);
    }

    fn fixed_update(&mut self, body: &mut PlayerBody<R>) {
        body.handle_movement();
        body.handle_jump();
    }
}

#[derive(Debug)]
pub struct JumpState;

impl<R: PlayerRig> State<PlayerBody<R>> for JumpState {
    fn name(&self) -> &str {
        "Jump"
    }

    fn on_enter(&mut self, body: &mut PlayerBody<R>) {
        body.cross_fade(Clip::Jump);
    }

    fn fixed_update(&mut self, body: &mut PlayerBody<R>) {
        body.handle_jump();
        body.handle_movement();
    }
}

#[derive(Debug)]
pub struct DashState;

impl<R: PlayerRig> State<PlayerBody<R>> for DashState {
    fn name(&self) -> &str {
        "Dash"
    }

    fn on_enter(&mut self, body: &mut PlayerBody<R>) {
        body.cross_fade(Clip::Dash);
    }

    fn fixed_update(&mut self, body: &mut PlayerBody<R>) {
        body.handle_movement();
        body.handle_jump();
    }
}

#[derive(Debug)]
pub struct AttackState;

impl<R: PlayerRig> State<PlayerBody<R>> for AttackState {
    fn name(&self) -> &str {
        "Attack"
    }

    fn on_enter(&mut self, body: &mut PlayerBody<R>) {
        body.cross_fade(Clip::Attack);
        body.rig.strike(body.config.attack_distance, body.config.attack_damage);
    }

    fn fixed_update(&mut self, body: &mut PlayerBody<R>) {
        body.handle_movement();
    }
}

/// The player agent: body, timers and the machine driving them.
#[derive(Debug)]
pub struct Player<R> {
    body: PlayerBody<R>,
    machine: StateMachine<PlayerBody<R>>,
    timers: TimerSet,
}

impl<R: PlayerRig + 'static> Player<R> {
    /// Wire timers and the locomotion / jump / dash / attack machine, then
    /// enter locomotion.
    pub fn new(rig: R, config: PlayerConfig) -> Result<Self, BuildError> {
        let health = Health::new(config.max_health);
        let jump_velocity = Rc::new(Cell::new(0.0));
        let dash_multiplier = Rc::new(Cell::new(1.0));

        let timers = PlayerTimers {
            jump: Timer::countdown(config.jump_duration),
            jump_cooldown: Timer::countdown(config.jump_cooldown),
            dash: Timer::countdown(config.dash_duration),
            dash_cooldown: Timer::countdown(config.dash_cooldown),
            attack: Timer::countdown(config.attack_cooldown),
        };
        wire_jump(&timers, &jump_velocity, config.jump_force);
        wire_dash(&timers, &dash_multiplier, &health, config.dash_force);

        let mut set = TimerSet::new();
        set.register(&timers.jump)
            .register(&timers.jump_cooldown)
            .register(&timers.dash)
            .register(&timers.dash_cooldown)
            .register(&timers.attack);

        let mut builder = StateMachineBuilder::with_config(&config.machine);
        let mut body = PlayerBody {
            rig,
            health,
            timers,
            jump_velocity,
            dash_multiplier,
            config,
        };

        let locomotion = builder.state(LocomotionState);
        let jump = builder.state(JumpState);
        let dash = builder.state(DashState);
        let attack = builder.state(AttackState);

        builder
            .at(locomotion, jump, |b: &PlayerBody<R>| b.timers.jump.is_running())
            .at(locomotion, dash, |b: &PlayerBody<R>| b.timers.dash.is_running())
            .at(locomotion, attack, |b: &PlayerBody<R>| {
                b.timers.attack.is_running()
            })
            .at(attack, locomotion, |b: &PlayerBody<R>| {
                !b.timers.attack.is_running()
            })
            .any(locomotion, |b: &PlayerBody<R>| {
                b.rig.is_grounded() && !b.timers.any_action_running()
            })
            .initial(locomotion);

        let machine = builder.build(&mut body)?;
        Ok(Self {
            body,
            machine,
            timers: set,
        })
    }

    /// Jump button pressed (`true`) or released (`false`).
    ///
    /// A press starts a jump when grounded and neither the jump nor its
    /// cooldown is running. Releasing early cuts the jump short.
    pub fn on_jump(&mut self, performed: bool) {
        let timers = &self.body.timers;
        if performed {
            if !timers.jump.is_running()
                && !timers.jump_cooldown.is_running()
                && self.body.rig.is_grounded()
            {
                timers.jump.start();
            }
        } else if timers.jump.is_running() {
            timers.jump.stop();
        }
    }

    /// Dash button pressed (`true`) or released (`false`).
    pub fn on_dash(&mut self, performed: bool) {
        let timers = &self.body.timers;
        if performed {
            if !timers.dash.is_running() && !timers.dash_cooldown.is_running() {
                timers.dash.start();
            }
        } else if timers.dash.is_running() {
            timers.dash.stop();
        }
    }

    pub fn on_attack(&mut self) {
        if !self.body.timers.attack.is_running() {
            self.body.timers.attack.start();
        }
    }

    /// Per-frame tick: resolve and update the machine, then advance timers.
    pub fn update(&mut self, delta: f32) {
        self.machine.update(&mut self.body);
        self.timers.tick(delta);
    }

    pub fn fixed_update(&mut self) {
        self.machine.fixed_update(&mut self.body);
    }

    pub fn state_name(&self) -> Option<&str> {
        self.machine.current_name()
    }

    pub fn body(&self) -> &PlayerBody<R> {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut PlayerBody<R> {
        &mut self.body
    }

    pub fn machine(&self) -> &StateMachine<PlayerBody<R>> {
        &self.machine
    }
}

fn wire_jump(timers: &PlayerTimers, velocity: &Rc<Cell<f32>>, force: f32) {
    let impulse = Rc::clone(velocity);
    timers.jump.on_start(move || impulse.set(force));

    let cooldown = timers.jump_cooldown.clone();
    timers.jump.on_stop(move || cooldown.start());
}

fn wire_dash(timers: &PlayerTimers, multiplier: &Rc<Cell<f32>>, health: &Health, force: f32) {
    let boost = Rc::clone(multiplier);
    let invincibility = health.invincibility();
    timers.dash.on_start(move || {
        boost.set(force);
        invincibility.set(true);
    });

    let boost = Rc::clone(multiplier);
    let invincibility = health.invincibility();
    let cooldown = timers.dash_cooldown.clone();
    timers.dash.on_stop(move || {
        boost.set(1.0);
        cooldown.start();
        invincibility.set(false);
    });
}
