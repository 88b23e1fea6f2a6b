//! Animation clips the bundled states cross-fade into.

use serde::{Deserialize, Serialize};

/// Animation clip identifiers shared by player and enemy states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clip {
    Locomotion,
    Jump,
    Dash,
    Attack,
}

impl Clip {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Locomotion => "Locomotion",
            Self::Jump => "Jump",
            Self::Dash => "Dash",
            Self::Attack => "Attack",
        }
    }
}

/// Animation playback collaborator.
pub trait Animator {
    /// Blend into `clip` over `duration` seconds.
    fn cross_fade(&mut self, clip: Clip, duration: f32);
}
