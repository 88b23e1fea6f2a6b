//! Ready-made agents built on the machine and timer primitives.
//!
//! - `Health`: hit points, invincibility and change notifications
//! - `Enemy`: chase / attack / death brain
//! - `Player`: locomotion / jump / dash / attack brain driven by timers
//!
//! Agents talk to the host engine through rig traits ([`EnemyRig`],
//! [`PlayerRig`]), so physics, navigation and animation stay outside the
//! crate.

pub mod animation;
pub mod enemy;
pub mod health;
pub mod player;

pub use animation::{Animator, Clip};
pub use enemy::{Enemy, EnemyBody, EnemyRig};
pub use health::{Health, Invincibility};
pub use player::{Player, PlayerBody, PlayerRig, PlayerTimers};
