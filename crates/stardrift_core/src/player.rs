//! Player state and damage rules

use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Maximum (and starting) player health
pub const MAX_HEALTH: i32 = 100;

/// Player identity assigned by the relay (or fixed locally in single-player)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a damage application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Player was already eliminated; nothing changed
    Ignored,

    /// Health was reduced but the player survives
    Damaged,

    /// Health crossed zero; this is the one elimination transition
    Eliminated,
}

/// A player in the session
#[derive(Debug, Clone)]
pub struct Player {
    /// Relay-assigned identity
    pub id: PlayerId,

    /// Display name
    pub name: String,

    /// Position in world space
    pub position: Vec3,

    /// Rotation as Euler angles in radians
    pub rotation: Vec3,

    /// Health, clamped to `[0, MAX_HEALTH]`
    pub health: i32,

    /// Score accumulated this session
    pub score: u32,

    /// Ready flag while in the lobby
    pub ready: bool,

    /// Terminal for the session once set
    pub eliminated: bool,
}

impl Player {
    /// Create a player at the origin with full health
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            health: MAX_HEALTH,
            score: 0,
            ready: false,
            eliminated: false,
        }
    }

    /// Apply damage, clamping health into `[0, MAX_HEALTH]`.
    ///
    /// Crossing zero produces exactly one [`DamageOutcome::Eliminated`];
    /// any damage after that is ignored.
    pub fn apply_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.eliminated {
            return DamageOutcome::Ignored;
        }

        self.health = (self.health - amount).clamp(0, MAX_HEALTH);
        if self.health == 0 {
            self.eliminated = true;
            DamageOutcome::Eliminated
        } else {
            DamageOutcome::Damaged
        }
    }

    /// Overwrite health from an authoritative source, keeping the clamp
    /// and the single elimination transition
    pub fn set_health(&mut self, health: i32) {
        self.health = health.clamp(0, MAX_HEALTH);
        if self.health == 0 {
            self.eliminated = true;
        }
    }

    /// Reset per-session state for a return to the lobby
    pub fn reset(&mut self) {
        self.position = Vec3::zeros();
        self.rotation = Vec3::zeros();
        self.health = MAX_HEALTH;
        self.score = 0;
        self.ready = false;
        self.eliminated = false;
    }
}
