//! End-to-end scenarios for machines, timers and agents.

use statecraft::agents::{Animator, Clip, Enemy, EnemyRig};
use statecraft::config::EnemyConfig;
use statecraft::core::{FuncPredicate, State, Via};
use statecraft::machine::StateMachine;
use statecraft::timer::{Timer, TimerSet};
use std::cell::{Cell, RefCell};
use std::ops::RangeInclusive;
use std::rc::Rc;

type Journal = Rc<RefCell<Vec<String>>>;

/// State that records its hooks in a shared journal, closing over its
/// collaborators instead of reading a context.
struct Recorder {
    name: &'static str,
    journal: Journal,
}

impl Recorder {
    fn new(name: &'static str, journal: &Journal) -> Self {
        Self {
            name,
            journal: Rc::clone(journal),
        }
    }
}

impl State for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn on_enter(&mut self, _: &mut ()) {
        self.journal.borrow_mut().push(format!("enter {}", self.name));
    }

    fn on_exit(&mut self, _: &mut ()) {
        self.journal.borrow_mut().push(format!("exit {}", self.name));
    }
}

#[test]
fn any_transition_overrides_and_sticks() {
    let journal = Journal::default();
    let mut machine = StateMachine::new();
    let a = machine.add_state(Recorder::new("A", &journal));
    let b = machine.add_state(Recorder::new("B", &journal));
    let c = machine.add_state(Recorder::new("C", &journal));

    let p1 = Rc::new(Cell::new(false));
    let p2 = Rc::new(Cell::new(false));
    let (forward, back, global) = (Rc::clone(&p1), Rc::clone(&p1), Rc::clone(&p2));

    machine
        .add_transition(a, b, FuncPredicate::new(move || forward.get()))
        .unwrap();
    machine
        .add_transition(b, a, FuncPredicate::new(move || !back.get()))
        .unwrap();
    machine
        .add_any_transition(c, FuncPredicate::new(move || global.get()))
        .unwrap();
    machine.set_state(a, &mut ()).unwrap();

    assert_eq!(machine.update(&mut ()), None);
    assert_eq!(machine.current(), Some(a));

    p1.set(true);
    assert_eq!(machine.update(&mut ()), Some(b));

    p2.set(true);
    assert_eq!(machine.update(&mut ()), Some(c));

    p1.set(false);
    p2.set(false);
    assert_eq!(machine.update(&mut ()), None);
    assert_eq!(machine.current(), Some(c));

    assert_eq!(
        *journal.borrow(),
        vec!["enter A", "exit A", "enter B", "exit B", "enter C"]
    );
    assert_eq!(machine.history().path(), vec!["A", "B", "C"]);
    assert_eq!(machine.history().last().map(|r| r.via), Some(Via::Any));
}

#[test]
fn any_self_target_is_suppressed_but_self_loop_reenters() {
    let journal = Journal::default();
    let mut machine = StateMachine::new();
    let idle = machine.add_state(Recorder::new("Idle", &journal));
    let hurt = machine.add_state(Recorder::new("Hurt", &journal));

    machine.add_any_transition(idle, |_: &()| true).unwrap();
    machine.add_transition(hurt, hurt, |_: &()| true).unwrap();

    machine.set_state(idle, &mut ()).unwrap();
    assert_eq!(machine.update(&mut ()), None);
    assert_eq!(machine.update(&mut ()), None);
    assert_eq!(*journal.borrow(), vec!["enter Idle"]);

    let journal = Journal::default();
    let mut machine = StateMachine::new();
    let hurt = machine.add_state(Recorder::new("Hurt", &journal));
    machine.add_transition(hurt, hurt, |_: &()| true).unwrap();
    machine.set_state(hurt, &mut ()).unwrap();

    assert_eq!(machine.update(&mut ()), Some(hurt));
    assert_eq!(*journal.borrow(), vec!["enter Hurt", "exit Hurt", "enter Hurt"]);
    assert!(machine.history().last().is_some_and(|r| r.is_reentry()));
}

#[test]
fn machine_without_current_state_ignores_ticks() {
    let journal = Journal::default();
    let mut machine = StateMachine::new();
    let a = machine.add_state(Recorder::new("A", &journal));
    machine.add_any_transition(a, |_: &()| true).unwrap();

    assert_eq!(machine.update(&mut ()), None);
    assert_eq!(machine.fixed_update(&mut ()), None);
    assert_eq!(machine.current(), None);
    assert_eq!(machine.ticks(), 0);
    assert!(journal.borrow().is_empty());
}

#[test]
fn countdown_expires_between_ticks() {
    let timer = Timer::countdown(0.5);
    let stops = Rc::new(Cell::new(0));
    let counter = Rc::clone(&stops);
    timer.on_stop(move || counter.set(counter.get() + 1));

    timer.start();
    timer.tick(0.3);
    assert!(timer.is_running());
    assert!((timer.progress() - 0.6).abs() < 1e-5);

    timer.tick(0.3);
    assert!(!timer.is_running());
    assert_eq!(timer.time(), 0.0);
    assert_eq!(stops.get(), 1);
}

#[test]
fn countdown_round_trip() {
    let timer = Timer::countdown(2.0);
    let stops = Rc::new(Cell::new(0));
    let counter = Rc::clone(&stops);
    timer.on_stop(move || counter.set(counter.get() + 1));

    timer.start();
    timer.tick(1.0);
    assert!(timer.is_running());

    timer.start();
    timer.tick(2.0);
    assert!(!timer.is_running());
    assert_eq!(stops.get(), 1);
}

#[test]
fn stop_notifies_once() {
    let timer = Timer::countdown(1.0);
    let stops = Rc::new(Cell::new(0));
    let counter = Rc::clone(&stops);
    timer.on_stop(move || counter.set(counter.get() + 1));

    timer.start();
    timer.stop();
    timer.stop();
    assert_eq!(stops.get(), 1);
}

#[test]
fn timer_gates_a_state() {
    let journal = Journal::default();
    let dash = Timer::countdown(0.25);
    let mut timers = TimerSet::new();
    timers.register(&dash);

    let mut machine = StateMachine::new();
    let run = machine.add_state(Recorder::new("Run", &journal));
    let dashing = machine.add_state(Recorder::new("Dash", &journal));

    let running = dash.clone();
    let stopped = dash.clone();
    machine
        .add_transition(run, dashing, FuncPredicate::new(move || running.is_running()))
        .unwrap();
    machine
        .add_transition(dashing, run, FuncPredicate::new(move || !stopped.is_running()))
        .unwrap();
    machine.set_state(run, &mut ()).unwrap();

    dash.start();
    let mut visited = Vec::new();
    for _ in 0..4 {
        machine.update(&mut ());
        timers.tick(0.1);
        visited.extend(machine.current_name().map(str::to_string));
    }

    assert_eq!(visited, vec!["Dash", "Dash", "Dash", "Run"]);
}

#[derive(Default)]
struct Dummy {
    reach: bool,
    strikes: u32,
    despawned: bool,
}

impl Animator for Dummy {
    fn cross_fade(&mut self, _clip: Clip, _duration: f32) {}
}

impl EnemyRig for Dummy {
    fn chase_player(&mut self) {}

    fn can_attack_player(&self) -> bool {
        self.reach
    }

    fn strike_player(&mut self, _damage: RangeInclusive<i32>) {
        self.strikes += 1;
    }

    fn despawn(&mut self) {
        self.despawned = true;
    }
}

#[test]
fn enemy_fights_until_killed() {
    let config = EnemyConfig::from_json(r#"{ "attack_cooldown": 0.5, "max_health": 20 }"#).unwrap();
    let mut enemy = Enemy::new(Dummy::default(), &config).unwrap();

    enemy.body_mut().rig.reach = true;
    for _ in 0..5 {
        enemy.update(0.25);
        enemy.fixed_update();
    }
    assert_eq!(enemy.state_name(), Some("Attack"));
    assert_eq!(enemy.body().rig.strikes, 3);

    enemy.take_damage(20);
    enemy.update(0.25);

    assert_eq!(enemy.state_name(), Some("Death"));
    assert!(enemy.body().rig.despawned);
    assert_eq!(enemy.machine().history().path(), vec!["Chase", "Attack", "Death"]);
}
