//! Arena
//!
//! This example drives a player and an enemy through a one-dimensional arena.
//!
//! Key concepts:
//! - Agents wired with the builder and configured from JSON
//! - Input handlers starting timers, the machine reacting on the next tick
//! - Variable `update` per frame, fixed `fixed_update` per physics step
//! - Transition logging through `tracing`
//!
//! Run with: RUST_LOG=statecraft=debug cargo run --example arena

use statecraft::agents::{Animator, Clip, Enemy, EnemyRig, Player, PlayerRig};
use statecraft::config::{EnemyConfig, PlayerConfig};
use std::cell::RefCell;
use std::error::Error;
use std::ops::RangeInclusive;
use std::rc::Rc;
use tracing_subscriber::{fmt, EnvFilter};

const FRAME: f32 = 1.0 / 60.0;

#[derive(Debug, Default)]
struct Arena {
    player_x: f32,
    player_y: f32,
    enemy_x: f32,
    damage_to_player: i32,
    damage_to_enemy: i32,
}

struct EnemyPuppet(Rc<RefCell<Arena>>);

impl Animator for EnemyPuppet {
    fn cross_fade(&mut self, clip: Clip, duration: f32) {
        tracing::trace!(clip = clip.name(), duration, "enemy animation");
    }
}

impl EnemyRig for EnemyPuppet {
    fn chase_player(&mut self) {
        let mut arena = self.0.borrow_mut();
        let step = (arena.player_x - arena.enemy_x).clamp(-0.05, 0.05);
        arena.enemy_x += step;
    }

    fn can_attack_player(&self) -> bool {
        let arena = self.0.borrow();
        (arena.player_x - arena.enemy_x).abs() <= 1.0
    }

    fn strike_player(&mut self, damage: RangeInclusive<i32>) {
        let rolled = (damage.start() + damage.end()) / 2;
        self.0.borrow_mut().damage_to_player += rolled;
    }

    fn despawn(&mut self) {
        tracing::info!("enemy despawned");
    }
}

struct PlayerPuppet(Rc<RefCell<Arena>>);

impl Animator for PlayerPuppet {
    fn cross_fade(&mut self, clip: Clip, duration: f32) {
        tracing::trace!(clip = clip.name(), duration, "player animation");
    }
}

impl PlayerRig for PlayerPuppet {
    fn is_grounded(&self) -> bool {
        self.0.borrow().player_y <= 0.0
    }

    fn move_horizontal(&mut self, speed: f32) {
        let mut arena = self.0.borrow_mut();
        let direction = (arena.enemy_x - arena.player_x).signum();
        arena.player_x += direction * speed;
    }

    fn set_vertical_velocity(&mut self, velocity: f32) {
        let mut arena = self.0.borrow_mut();
        arena.player_y = (arena.player_y + velocity * FRAME).max(0.0);
    }

    fn strike(&mut self, reach: f32, damage: i32) {
        let mut arena = self.0.borrow_mut();
        if (arena.enemy_x - arena.player_x).abs() <= reach {
            arena.damage_to_enemy += damage;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("statecraft=info")),
        )
        .with_target(false)
        .init();

    println!("=== Arena ===\n");

    let arena = Rc::new(RefCell::new(Arena {
        enemy_x: 8.0,
        ..Arena::default()
    }));

    let player_config = PlayerConfig::from_json(r#"{ "move_speed": 4.0, "attack_damage": 25 }"#)?;
    let enemy_config = EnemyConfig::from_json(r#"{ "attack_cooldown": 0.75 }"#)?;

    let mut player = Player::new(PlayerPuppet(Rc::clone(&arena)), player_config.clone())?;
    let mut enemy = Enemy::new(EnemyPuppet(Rc::clone(&arena)), &enemy_config)?;

    let mut accumulator = 0.0;
    for frame in 0..900u32 {
        match frame {
            30 => player.on_jump(true),
            50 => player.on_jump(false),
            120 => player.on_dash(true),
            _ => {}
        }
        if frame > 180 && frame % 20 == 0 {
            player.on_attack();
        }

        player.update(FRAME);
        enemy.update(FRAME);

        accumulator += FRAME;
        while accumulator >= player_config.fixed_delta {
            player.fixed_update();
            enemy.fixed_update();
            accumulator -= player_config.fixed_delta;
        }

        let (to_player, to_enemy) = {
            let mut arena = arena.borrow_mut();
            (
                std::mem::take(&mut arena.damage_to_player),
                std::mem::take(&mut arena.damage_to_enemy),
            )
        };
        if to_player > 0 {
            player.body_mut().health.take_damage(to_player);
        }
        if to_enemy > 0 {
            enemy.take_damage(to_enemy);
        }

        if enemy.is_dead() || player.body().health.is_dead() {
            enemy.update(FRAME);
            println!("Fight over at frame {frame}");
            break;
        }
    }

    println!("\nPlayer: {:?}", player.body().health);
    println!("Enemy:  {:?}", enemy.body().health);

    println!("\nPlayer states:");
    for record in player.machine().history().records() {
        println!(
            "  tick {:>4}: {} -> {} ({:?})",
            record.tick,
            record.from_name.as_deref().unwrap_or("-"),
            record.to_name,
            record.via
        );
    }
    println!("\nEnemy path: {}", enemy.machine().history().path().join(" -> "));

    println!("\n=== Example Complete ===");
    Ok(())
}
