//! Melee enemy: chase the player, strike while in reach, despawn on death.
//!
//! Navigation, hit detection and damage rolls belong to the host engine and
//! are reached through [`EnemyRig`]. The brain only decides *when* to call
//! them.

use crate::agents::animation::{Animator, Clip};
use crate::agents::health::Health;
use crate::builder::{BuildError, StateMachineBuilder};
use crate::config::EnemyConfig;
use crate::core::State;
use crate::machine::StateMachine;
use crate::timer::Timer;
use std::cell::Cell;
use std::ops::RangeInclusive;
use std::rc::Rc;

/// Engine side of an enemy.
pub trait EnemyRig: Animator {
    /// Steer towards the player's current position.
    fn chase_player(&mut self);

    /// Whether the player is within striking distance.
    fn can_attack_player(&self) -> bool;

    /// Hit the player for a damage amount rolled from `damage`. Both bounds
    /// are possible outcomes.
    fn strike_player(&mut self, damage: RangeInclusive<i32>);

    /// Remove the enemy from the world.
    fn despawn(&mut self);
}

/// Context shared by the enemy's states and predicates.
#[derive(Debug)]
pub struct EnemyBody<R> {
    pub rig: R,
    pub health: Health,
    delta: f32,
    crossfade: f32,
}

impl<R> EnemyBody<R> {
    /// Seconds elapsed in the frame being processed.
    pub fn delta(&self) -> f32 {
        self.delta
    }
}

#[derive(Debug)]
pub struct ChaseState {
    crossfade: f32,
}

impl<R: EnemyRig> State<EnemyBody<R>> for ChaseState {
    fn name(&self) -> &str {
        "Chase"
    }

    fn fixed_update(&mut self, body: &mut EnemyBody<R>) {
        body.rig.cross_fade(Clip::Locomotion, self.crossfade);
        body.rig.chase_player();
    }
}

/// Strikes on entry, then again every time its cooldown runs out.
#[derive(Debug)]
pub struct AttackState {
    cooldown: Timer,
    ready: Rc<Cell<bool>>,
    damage: RangeInclusive<i32>,
}

impl AttackState {
    pub fn new(config: &EnemyConfig) -> Self {
        let cooldown = Timer::countdown(config.attack_cooldown);
        let ready = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ready);
        cooldown.on_stop(move || flag.set(true));

        Self {
            cooldown,
            ready,
            damage: config.min_damage..=config.max_damage,
        }
    }

    fn strike<R: EnemyRig>(&self, body: &mut EnemyBody<R>) {
        body.rig.cross_fade(Clip::Attack, body.crossfade);
        body.rig.strike_player(self.damage.clone());
        tracing::trace!(damage = ?self.damage, "enemy strike");
        self.cooldown.start();
    }
}

impl<R: EnemyRig> State<EnemyBody<R>> for AttackState {
    fn name(&self) -> &str {
        "Attack"
    }

    fn on_enter(&mut self, body: &mut EnemyBody<R>) {
        self.ready.set(false);
        self.strike(body);
    }

    fn update(&mut self, body: &mut EnemyBody<R>) {
        self.cooldown.tick(body.delta);
        if self.ready.replace(false) {
            self.strike(body);
        }
    }

    fn on_exit(&mut self, _body: &mut EnemyBody<R>) {
        // Stopping fires the stop event; leaving must not queue another strike.
        self.cooldown.stop();
        self.ready.set(false);
    }
}

#[derive(Debug)]
pub struct DeathState;

impl<R: EnemyRig> State<EnemyBody<R>> for DeathState {
    fn name(&self) -> &str {
        "Death"
    }

    fn on_enter(&mut self, body: &mut EnemyBody<R>) {
        tracing::debug!("enemy died");
        body.rig.despawn();
    }
}

/// An enemy agent: its body and the machine driving it.
#[derive(Debug)]
pub struct Enemy<R> {
    body: EnemyBody<R>,
    machine: StateMachine<EnemyBody<R>>,
}

impl<R: EnemyRig + 'static> Enemy<R> {
    /// Wire the chase / attack / death machine and start chasing.
    pub fn new(rig: R, config: &EnemyConfig) -> Result<Self, BuildError> {
        let mut body = EnemyBody {
            rig,
            health: Health::new(config.max_health),
            delta: 0.0,
            crossfade: config.crossfade,
        };

        let mut builder = StateMachineBuilder::with_config(&config.machine);
        let chase = builder.state(ChaseState {
            crossfade: config.crossfade,
        });
        let attack = builder.state(AttackState::new(config));
        let death = builder.state(DeathState);

        builder
            .at(chase, attack, |b: &EnemyBody<R>| b.rig.can_attack_player())
            .at(attack, chase, |b: &EnemyBody<R>| !b.rig.can_attack_player())
            .any(death, |b: &EnemyBody<R>| b.health.is_dead())
            .initial(chase);

        let machine = builder.build(&mut body)?;
        Ok(Self { body, machine })
    }

    /// Per-frame tick with the frame's elapsed seconds.
    pub fn update(&mut self, delta: f32) {
        self.body.delta = delta.max(0.0);
        self.machine.update(&mut self.body);
    }

    pub fn fixed_update(&mut self) {
        self.machine.fixed_update(&mut self.body);
    }

    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.body.health.take_damage(amount)
    }

    pub fn is_dead(&self) -> bool {
        self.body.health.is_dead()
    }

    pub fn state_name(&self) -> Option<&str> {
        self.machine.current_name()
    }

    pub fn body(&self) -> &EnemyBody<R> {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut EnemyBody<R> {
        &mut self.body
    }

    pub fn machine(&self) -> &StateMachine<EnemyBody<R>> {
        &self.machine
    }
}
